//! Named structural queries over an XMI element tree.
//!
//! Each function corresponds to one fixed path through the SysML v2 XMI
//! serialization:
//!
//! - top package: `Namespace/ownedRelationship[OwningMembership]/ownedRelatedElement[LibraryPackage]`
//! - members: `ownedRelationship[OwningMembership]/ownedRelatedElement`
//! - references: `ownedRelationship[<relationship>]` carrying the target
//!   either as an attribute (`superclassifier="Base.kermlx#id"`) or as a
//!   nested element with an `href` (`<superclassifier href="Base.kermlx#id"/>`)

use taxonomize_schemas::ClassifierId;

use crate::xmi::Element;

const OWNED_RELATIONSHIP: &str = "ownedRelationship";
const OWNED_RELATED_ELEMENT: &str = "ownedRelatedElement";
const OWNING_MEMBERSHIP: &str = "OwningMembership";
const LIBRARY_PACKAGE: &str = "LibraryPackage";

/// A relationship kind whose target is a classifier reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReferenceShape {
    /// `xsi:type` of the relationship element.
    pub relationship: &'static str,
    /// Attribute (or nested element) naming the target.
    pub feature: &'static str,
}

/// `Subclassification` relationships: declared superclasses.
pub(crate) const SUPERCLASSIFIER: ReferenceShape = ReferenceShape {
    relationship: "Subclassification",
    feature: "superclassifier",
};

/// `Disjoining` relationships: declared disjoint classes.
pub(crate) const DISJOINING_TYPE: ReferenceShape = ReferenceShape {
    relationship: "Disjoining",
    feature: "disjoiningType",
};

/// Finds the library package owned by the document's root namespace.
///
/// Returns the first match; documents are expected to hold exactly one.
pub(crate) fn top_library_package(root: &Element) -> Option<&Element> {
    if root.local_name() != "Namespace" {
        return None;
    }
    owned_members(root).find(|elem| elem.type_tag() == Some(LIBRARY_PACKAGE))
}

/// Iterates the elements owned by `node` through owning memberships.
pub(crate) fn owned_members(node: &Element) -> impl Iterator<Item = &Element> {
    node.children_named(OWNED_RELATIONSHIP)
        .filter(|rel| rel.type_tag() == Some(OWNING_MEMBERSHIP))
        .flat_map(|rel| rel.children_named(OWNED_RELATED_ELEMENT))
}

/// Collects the targets of every `shape` relationship owned by `node`,
/// from both the attribute form and the nested `href` form, in document
/// order. Reference attributes may list several space-separated targets.
pub(crate) fn references(node: &Element, shape: ReferenceShape) -> Vec<ClassifierId> {
    let mut targets = Vec::new();
    for rel in node
        .children_named(OWNED_RELATIONSHIP)
        .filter(|rel| rel.type_tag() == Some(shape.relationship))
    {
        if let Some(raw) = rel.attr(shape.feature) {
            targets.extend(raw.split_whitespace().filter_map(ClassifierId::from_reference));
        }
        targets.extend(
            rel.children_named(shape.feature)
                .filter_map(|nested| nested.attr("href"))
                .filter_map(ClassifierId::from_reference),
        );
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmi::parse;

    const DOC: &str = r##"<sysml:Namespace xmlns:sysml="s" xmlns:xsi="x">
      <ownedRelationship xsi:type="sysml:OwningMembership">
        <ownedRelatedElement xsi:type="sysml:LibraryPackage" declaredName="Base">
          <ownedRelationship xsi:type="sysml:OwningMembership">
            <ownedRelatedElement xsi:type="sysml:Classifier" elementId="c1" declaredName="Thing">
              <ownedRelationship xsi:type="sysml:Subclassification" superclassifier="Other.kermlx#s1 #s2"/>
              <ownedRelationship xsi:type="sysml:Subclassification">
                <superclassifier href="../Other.kermlx#s3"/>
              </ownedRelationship>
              <ownedRelationship xsi:type="sysml:Disjoining" disjoiningType="#d1"/>
              <ownedRelationship xsi:type="sysml:Disjoining">
                <disjoiningType href="Other.kermlx#d2"/>
              </ownedRelationship>
            </ownedRelatedElement>
          </ownedRelationship>
          <ownedRelationship xsi:type="sysml:Membership">
            <ownedRelatedElement xsi:type="sysml:Classifier" elementId="c2" declaredName="Aliased"/>
          </ownedRelationship>
        </ownedRelatedElement>
      </ownedRelationship>
    </sysml:Namespace>"##;

    fn ids(v: &[ClassifierId]) -> Vec<&str> {
        v.iter().map(ClassifierId::as_str).collect()
    }

    #[test]
    fn test_top_library_package() {
        let root = parse(DOC).unwrap();
        let pkg = top_library_package(&root).unwrap();
        assert_eq!(pkg.attr("declaredName"), Some("Base"));
    }

    #[test]
    fn test_top_package_requires_namespace_root() {
        let root = parse(r#"<Other><ownedRelationship/></Other>"#).unwrap();
        assert!(top_library_package(&root).is_none());
    }

    #[test]
    fn test_top_package_requires_library_package() {
        let root = parse(
            r#"<Namespace><ownedRelationship type="OwningMembership">
                 <ownedRelatedElement type="Package" declaredName="P"/>
               </ownedRelationship></Namespace>"#,
        )
        .unwrap();
        assert!(top_library_package(&root).is_none());
    }

    #[test]
    fn test_owned_members_skip_non_owning() {
        let root = parse(DOC).unwrap();
        let pkg = top_library_package(&root).unwrap();
        let names: Vec<_> = owned_members(pkg)
            .filter_map(|m| m.attr("declaredName"))
            .collect();
        assert_eq!(names, vec!["Thing"]);
    }

    #[test]
    fn test_superclass_both_shapes() {
        let root = parse(DOC).unwrap();
        let pkg = top_library_package(&root).unwrap();
        let thing = owned_members(pkg).next().unwrap();
        assert_eq!(ids(&references(thing, SUPERCLASSIFIER)), vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn test_disjoining_both_shapes() {
        let root = parse(DOC).unwrap();
        let pkg = top_library_package(&root).unwrap();
        let thing = owned_members(pkg).next().unwrap();
        assert_eq!(ids(&references(thing, DISJOINING_TYPE)), vec!["d1", "d2"]);
    }
}
