// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Boolean conditions over the tags carried by an access path.

use std::sync::Arc;

use crate::{validate_identifier, AccessPath, DatalogPrintContext, IrError};

/// The atomic condition: the owner's view of the path must carry `tag`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagPresence {
    tag: String,
}

impl TagPresence {
    /// A presence test for `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// The tag tested for.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn to_datalog_rule_body(&self, access_path: &AccessPath, ctxt: &DatalogPrintContext) -> String {
        format!(
            "mustHaveTag(\"{}\", owner, \"{}\")",
            access_path.to_datalog(ctxt),
            self.tag
        )
    }
}

/// A predicate tree.
///
/// Children are `Arc`s: one declared predicate can be shared by several
/// checks, and subtrees can be shared inside a tree. Equality is structural;
/// pointer-equal children are taken as equal without descending, which never
/// changes the answer.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "op", rename_all = "snake_case")
)]
pub enum Predicate {
    /// Atomic tag test.
    TagPresence(TagPresence),
    /// Both operands hold.
    And {
        /// Left operand.
        lhs: Arc<Predicate>,
        /// Right operand.
        rhs: Arc<Predicate>,
    },
    /// At least one operand holds.
    Or {
        /// Left operand.
        lhs: Arc<Predicate>,
        /// Right operand.
        rhs: Arc<Predicate>,
    },
    /// The operand does not hold.
    Not {
        /// Negated operand.
        operand: Arc<Predicate>,
    },
}

impl Predicate {
    /// `TagPresence(tag)`.
    pub fn tag_presence(tag: impl Into<String>) -> Self {
        Self::TagPresence(TagPresence::new(tag))
    }

    /// `lhs AND rhs`.
    pub fn and(lhs: impl Into<Arc<Self>>, rhs: impl Into<Arc<Self>>) -> Self {
        Self::And {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// `lhs OR rhs`.
    pub fn or(lhs: impl Into<Arc<Self>>, rhs: impl Into<Arc<Self>>) -> Self {
        Self::Or {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// `NOT operand`.
    pub fn not(operand: impl Into<Arc<Self>>) -> Self {
        Self::Not {
            operand: operand.into(),
        }
    }

    /// `antecedent => consequent`, built as `(NOT antecedent) OR consequent`.
    pub fn implies(antecedent: impl Into<Arc<Self>>, consequent: impl Into<Arc<Self>>) -> Self {
        Self::or(Self::not(antecedent), consequent)
    }

    /// Compiles the predicate into a rule-body fragment over the free
    /// variable `owner` and the Datalog term of `access_path`.
    ///
    /// Conjunction renders as `(a), (b)` and disjunction as `((a); (b))`.
    /// The outer parentheses keep a disjunction inside whatever conjunction
    /// it is spliced into, since `,` binds tighter than `;`.
    /// Negation of a tag test negates the atom directly. Negation of a
    /// composite is routed through a helper relation minted on `ctxt`, so
    /// every negation in the output applies to a single atom with `owner`
    /// bound.
    pub fn to_datalog_rule_body(
        &self,
        access_path: &AccessPath,
        ctxt: &mut DatalogPrintContext,
    ) -> String {
        match self {
            Self::TagPresence(presence) => presence.to_datalog_rule_body(access_path, ctxt),
            Self::And { lhs, rhs } => {
                let lhs = lhs.to_datalog_rule_body(access_path, ctxt);
                let rhs = rhs.to_datalog_rule_body(access_path, ctxt);
                format!("({lhs}), ({rhs})")
            }
            Self::Or { lhs, rhs } => {
                let lhs = lhs.to_datalog_rule_body(access_path, ctxt);
                let rhs = rhs.to_datalog_rule_body(access_path, ctxt);
                format!("(({lhs}); ({rhs}))")
            }
            Self::Not { operand } => match operand.as_ref() {
                Self::TagPresence(presence) => {
                    format!("!{}", presence.to_datalog_rule_body(access_path, ctxt))
                }
                composite => {
                    let relation = ctxt.get_unique_helper_relation();
                    let path = access_path.to_datalog(ctxt);
                    let body = composite.to_datalog_rule_body(access_path, ctxt);
                    let rule =
                        format!("{relation}(owner) :- ownsAccessPath(owner, \"{path}\"), {body}.");
                    let negated = format!("!{relation}(owner)");
                    ctxt.add_helper_rule(relation, rule);
                    negated
                }
            },
        }
    }

    /// Validates every tag name in the tree.
    pub fn validate(&self) -> Result<(), IrError> {
        match self {
            Self::TagPresence(presence) => validate_identifier(&presence.tag),
            Self::And { lhs, rhs } | Self::Or { lhs, rhs } => {
                lhs.validate()?;
                rhs.validate()
            }
            Self::Not { operand } => operand.validate(),
        }
    }

    /// Number of nodes in the tree, counting shared subtrees once per use.
    pub fn node_count(&self) -> usize {
        match self {
            Self::TagPresence(_) => 1,
            Self::And { lhs, rhs } | Self::Or { lhs, rhs } => 1 + lhs.node_count() + rhs.node_count(),
            Self::Not { operand } => 1 + operand.node_count(),
        }
    }
}

/// Structural equality with a pointer-equality shortcut.
pub(crate) fn same_predicate(a: &Arc<Predicate>, b: &Arc<Predicate>) -> bool {
    Arc::ptr_eq(a, b) || **a == **b
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TagPresence(a), Self::TagPresence(b)) => a == b,
            (Self::And { lhs: l1, rhs: r1 }, Self::And { lhs: l2, rhs: r2 })
            | (Self::Or { lhs: l1, rhs: r1 }, Self::Or { lhs: l2, rhs: r2 }) => {
                same_predicate(l1, l2) && same_predicate(r1, r2)
            }
            (Self::Not { operand: a }, Self::Not { operand: b }) => same_predicate(a, b),
            _ => false,
        }
    }
}

impl Eq for Predicate {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessPathRoot, AccessPathSelectors};

    fn path() -> AccessPath {
        AccessPath::new(
            AccessPathRoot::handle_connection("r", "p", "h"),
            AccessPathSelectors::from_fields(["f"]),
        )
    }

    #[test]
    fn tag_presence_body() {
        let mut ctxt = DatalogPrintContext::new();
        assert_eq!(
            Predicate::tag_presence("userSelection").to_datalog_rule_body(&path(), &mut ctxt),
            r#"mustHaveTag("r.p.h.f", owner, "userSelection")"#
        );
    }

    #[test]
    fn and_or_bodies_nest_children() {
        let mut ctxt = DatalogPrintContext::new();
        let pred = Predicate::or(
            Predicate::and(Predicate::tag_presence("a"), Predicate::tag_presence("b")),
            Predicate::tag_presence("c"),
        );
        assert_eq!(
            pred.to_datalog_rule_body(&path(), &mut ctxt),
            concat!(
                r#"(((mustHaveTag("r.p.h.f", owner, "a")), (mustHaveTag("r.p.h.f", owner, "b"))); "#,
                r#"(mustHaveTag("r.p.h.f", owner, "c")))"#
            )
        );
        assert!(ctxt.helper_rules().is_empty());
    }

    #[test]
    fn negated_atom_is_inlined() {
        let mut ctxt = DatalogPrintContext::new();
        let body = Predicate::not(Predicate::tag_presence("a")).to_datalog_rule_body(&path(), &mut ctxt);
        assert_eq!(body, r#"!mustHaveTag("r.p.h.f", owner, "a")"#);
        assert!(ctxt.helper_rules().is_empty());
    }

    #[test]
    fn disjunction_is_one_conjunct() {
        let mut ctxt = DatalogPrintContext::new();
        let pred = Predicate::or(
            Predicate::tag_presence("a"),
            Predicate::not(Predicate::tag_presence("b")),
        );
        assert_eq!(
            pred.to_datalog_rule_body(&path(), &mut ctxt),
            r#"((mustHaveTag("r.p.h.f", owner, "a")); (!mustHaveTag("r.p.h.f", owner, "b")))"#
        );
    }

    #[test]
    fn negated_composite_uses_a_helper_relation() {
        let mut ctxt = DatalogPrintContext::new();
        let pred = Predicate::not(Predicate::and(
            Predicate::tag_presence("a"),
            Predicate::tag_presence("b"),
        ));
        assert_eq!(pred.to_datalog_rule_body(&path(), &mut ctxt), "!notHelper0(owner)");
        let helpers = ctxt.helper_rules();
        assert_eq!(helpers.len(), 1);
        assert_eq!(helpers[0].relation, "notHelper0");
        assert_eq!(
            helpers[0].rule,
            concat!(
                r#"notHelper0(owner) :- ownsAccessPath(owner, "r.p.h.f"), "#,
                r#"(mustHaveTag("r.p.h.f", owner, "a")), (mustHaveTag("r.p.h.f", owner, "b"))."#
            )
        );
    }

    #[test]
    fn implies_is_not_or() {
        let a = Arc::new(Predicate::tag_presence("a"));
        let b = Arc::new(Predicate::tag_presence("b"));
        assert_eq!(
            Predicate::implies(Arc::clone(&a), Arc::clone(&b)),
            Predicate::or(Predicate::not(a), b)
        );
    }

    #[test]
    fn equality_is_structural() {
        let shared = Arc::new(Predicate::tag_presence("x"));
        let by_identity = Predicate::not(Arc::clone(&shared));
        let by_structure = Predicate::not(Predicate::tag_presence("x"));
        assert_eq!(by_identity, by_structure);
        assert_eq!(Predicate::not(Arc::clone(&shared)), by_identity);
        assert_ne!(
            Predicate::and(Predicate::tag_presence("x"), Predicate::tag_presence("y")),
            Predicate::or(Predicate::tag_presence("x"), Predicate::tag_presence("y"))
        );
        assert_ne!(
            Predicate::and(Predicate::tag_presence("x"), Predicate::tag_presence("y")),
            Predicate::and(Predicate::tag_presence("y"), Predicate::tag_presence("x"))
        );
    }

    #[test]
    fn node_count_counts_every_use() {
        let leaf = Arc::new(Predicate::tag_presence("x"));
        let pred = Predicate::and(Arc::clone(&leaf), Predicate::not(leaf));
        assert_eq!(pred.node_count(), 4);
    }
}
