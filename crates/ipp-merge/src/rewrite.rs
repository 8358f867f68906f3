//! Baseline path rewrites.
//!
//! Rules run in order on an owned tree and return the rewritten tree. A rule
//! detaches the node at its old path; when it names a new path the node is
//! renamed to the last segment and attached there, with missing intermediate
//! groups created on the way.

use tracing::debug;

use ipp_model::{Node, Origin, RewriteRule};

use crate::error::RewriteError;

pub fn apply_rewrites(mut baseline: Node, rules: &[RewriteRule]) -> Result<Node, RewriteError> {
    for rule in rules {
        apply_rule(&mut baseline, rule)?;
        debug!(rule = %rule, "applied baseline rewrite");
    }
    Ok(baseline)
}

fn apply_rule(root: &mut Node, rule: &RewriteRule) -> Result<(), RewriteError> {
    let mut node = detach(root, rule)?;
    let Some(new_path) = &rule.new_path else {
        return Ok(());
    };
    let Some((name, parents)) = new_path.split_last() else {
        return Ok(());
    };

    let mut parent = root;
    for (depth, segment) in parents.iter().enumerate() {
        let kind = parent.kind_name();
        let Some(children) = parent.children_mut() else {
            return Err(RewriteError::NotAGroup {
                rule: rule.to_string(),
                path: new_path[..depth].join("."),
                kind,
            });
        };
        parent = children
            .entry(segment.clone())
            .or_insert_with(|| Node::group(segment.clone(), Origin::Baseline));
    }

    let kind = parent.kind_name();
    let Some(children) = parent.children_mut() else {
        return Err(RewriteError::NotAGroup {
            rule: rule.to_string(),
            path: parents.join("."),
            kind,
        });
    };
    if children.contains_key(name) {
        return Err(RewriteError::PathExists {
            rule: rule.to_string(),
            path: new_path.join("."),
        });
    }
    node.code = name.clone();
    children.insert(name.clone(), node);
    Ok(())
}

fn detach(root: &mut Node, rule: &RewriteRule) -> Result<Node, RewriteError> {
    let not_found = || RewriteError::PathNotFound {
        rule: rule.to_string(),
        path: rule.old_path.join("."),
    };
    let (name, parents) = rule.old_path.split_last().ok_or_else(not_found)?;
    let mut parent = root;
    for segment in parents {
        parent = parent
            .children_mut()
            .and_then(|children| children.get_mut(segment))
            .ok_or_else(not_found)?;
    }
    parent
        .children_mut()
        .and_then(|children| children.remove(name))
        .ok_or_else(not_found)
}
