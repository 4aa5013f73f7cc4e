//! Profile group expansion and the document applicability filter.
//!
//! Grounded on the depth-first, cycle-detecting expansion used for profile
//! *inheritance* elsewhere in this corpus, adapted from "merge a parent's
//! fields into a child" semantics to "expand a group name into an ordered,
//! duplicate-suppressed list of member names" semantics.

use indexmap::{IndexMap, IndexSet};

use crate::error::ResolveError;
use crate::model::ConfigDocument;

/// A `spring.profiles.group.*` table: group name to ordered member list.
pub type GroupTable = IndexMap<String, Vec<String>>;

/// Collects the group table from the base documents (index 0, unconditional
/// activation, unsuffixed `application.*` file) of main-resource files only.
///
/// Multiple qualifying base documents (e.g. from more than one
/// `--resources` root) are merged later-wins at the whole-group-table
/// level: a group name redefined by a later root's base document fully
/// replaces the earlier definition rather than unioning members.
pub fn collect_groups(documents: &[ConfigDocument]) -> GroupTable {
    let mut groups = GroupTable::new();
    for document in documents {
        if !document.is_main || !document.is_base_document() {
            continue;
        }
        let Some(group_value) = document.content.get("spring.profiles.group") else {
            continue;
        };
        let Some(table) = group_value.as_object() else {
            continue;
        };
        for (name, members_value) in table {
            let members = match members_value.as_str() {
                Some(csv) => csv
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
                None => members_value
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default(),
            };
            groups.insert(name.clone(), members);
        }
    }
    groups
}

/// Expands the requested profile list into the fully active, ordered,
/// duplicate-suppressed list, per the depth-first `expand` algorithm:
/// a group name is emitted before its members, a name already emitted is
/// skipped, and re-entering a name on the current expansion path is a
/// fatal cycle naming the offending chain.
pub fn expand_profiles(requested: &[String], groups: &GroupTable) -> Result<Vec<String>, ResolveError> {
    let mut emitted: Vec<String> = Vec::new();
    let mut emitted_set: IndexSet<String> = IndexSet::new();
    let mut visiting: Vec<String> = Vec::new();

    for profile in requested {
        expand_one(profile, groups, &mut emitted, &mut emitted_set, &mut visiting)?;
    }
    Ok(emitted)
}

fn expand_one(
    name: &str,
    groups: &GroupTable,
    emitted: &mut Vec<String>,
    emitted_set: &mut IndexSet<String>,
    visiting: &mut Vec<String>,
) -> Result<(), ResolveError> {
    if visiting.iter().any(|v| v == name) {
        visiting.push(name.to_string());
        let chain = display_cycle(visiting);
        tracing::error!(chain = %chain, "profile group cycle detected");
        return Err(ResolveError::profile_group_cycle(chain));
    }
    if emitted_set.contains(name) {
        tracing::debug!(profile = name, "profile already emitted, skipping");
        return Ok(());
    }

    emitted.push(name.to_string());
    emitted_set.insert(name.to_string());

    if let Some(members) = groups.get(name) {
        tracing::debug!(group = name, members = ?members, "expanding profile group");
        visiting.push(name.to_string());
        for member in members {
            expand_one(member, groups, emitted, emitted_set, visiting)?;
        }
        visiting.pop();
    }

    Ok(())
}

fn display_cycle(visiting: &[String]) -> String {
    let start = visiting
        .iter()
        .position(|v| v == visiting.last().unwrap())
        .unwrap_or(0);
    visiting[start..].join(" -> ")
}

/// Filters documents down to those applicable under the active profile set,
/// preserving each document's original position within its file and each
/// file's discovery order.
pub fn filter_applicable(
    documents: Vec<ConfigDocument>,
    active: &IndexSet<String>,
) -> Vec<ConfigDocument> {
    documents
        .into_iter()
        .filter(|doc| doc.is_applicable(active))
        .collect()
}
