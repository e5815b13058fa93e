// SPDX-License-Identifier: AGPL-3.0
// Cardbook Core - List presentation
//
// Turns the merged contact list and a search query into first-letter
// sections. Pure functions, cheap enough to run on every keystroke.

use crate::contact::Contact;
use std::collections::BTreeMap;

/// Section key for names that have no first character
pub const FALLBACK_GROUP: &str = "#";

/// Sections keyed by uppercase first letter, in ascending key order
pub type GroupedContacts = BTreeMap<String, Vec<Contact>>;

/// Contacts whose name contains `query`, ignoring case
pub fn filter_contacts(contacts: &[Contact], query: &str) -> Vec<Contact> {
    if query.is_empty() {
        return contacts.to_vec();
    }

    let needle = query.to_lowercase();
    contacts
        .iter()
        .filter(|contact| contact.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Section key for a name
pub fn group_key(name: &str) -> String {
    match name.chars().next() {
        Some(first) => first.to_uppercase().collect(),
        None => FALLBACK_GROUP.to_string(),
    }
}

/// Filter by `query`, then split into sections keeping the input order
pub fn group_contacts(contacts: &[Contact], query: &str) -> GroupedContacts {
    let mut groups = GroupedContacts::new();
    for contact in filter_contacts(contacts, query) {
        groups
            .entry(group_key(&contact.name))
            .or_default()
            .push(contact);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts(names: &[&str]) -> Vec<Contact> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Contact::new(i as u32 + 1, *name, "#FFFFFF"))
            .collect()
    }

    fn names(list: &[Contact]) -> Vec<&str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let list = contacts(&["Ann", "Bob"]);
        assert_eq!(filter_contacts(&list, ""), list);
    }

    #[test]
    fn test_filter_and_group_case_insensitive() {
        let list = contacts(&["Ann", "Bob", "Amy"]);
        let grouped = group_contacts(&list, "a");

        assert_eq!(grouped.len(), 1);
        assert_eq!(names(&grouped["A"]), vec!["Ann", "Amy"]);
    }

    #[test]
    fn test_uppercase_query_matches_lowercase_name() {
        let list = contacts(&["maria", "Bob"]);
        assert_eq!(names(&filter_contacts(&list, "MAR")), vec!["maria"]);
    }

    #[test]
    fn test_groups_sorted_by_key() {
        let list = contacts(&["zoe", "Bob", "ann", "Amy"]);
        let grouped = group_contacts(&list, "");

        let keys: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B", "Z"]);
        assert_eq!(names(&grouped["A"]), vec!["ann", "Amy"]);
    }

    #[test]
    fn test_empty_name_goes_to_fallback_group() {
        let list = contacts(&["", "Ann"]);
        let grouped = group_contacts(&list, "");
        assert_eq!(grouped[FALLBACK_GROUP].len(), 1);
        assert_eq!(grouped.keys().next().map(String::as_str), Some(FALLBACK_GROUP));
    }

    #[test]
    fn test_no_match_is_empty() {
        let list = contacts(&["Ann"]);
        assert!(group_contacts(&list, "xyz").is_empty());
    }
}
