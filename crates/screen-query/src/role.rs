//! Implicit ARIA roles and accessible-name rules.
//!
//! Roles come from a fixed tag table; an explicit `role` attribute always wins.

use std::collections::BTreeMap;

use crate::element::TagKind;

/// Roles whose accessible name may be computed from their content
pub const NAME_FROM_CONTENT_ROLES: &[&str] = &[
    "button",
    "cell",
    "checkbox",
    "columnheader",
    "heading",
    "link",
    "menuitem",
    "option",
    "radio",
    "row",
    "switch",
    "tab",
    "tooltip",
    "treeitem",
];

/// Default role implied by a tag and its attributes.
#[must_use]
pub fn implicit_role(tag: &TagKind, attributes: &BTreeMap<String, String>) -> Option<&'static str> {
    let attr = |name: &str| attributes.get(name).map(String::as_str);
    match tag {
        TagKind::Button => Some("button"),
        TagKind::A if attr("href").is_some() => Some("link"),
        TagKind::Input => input_role(attr("type")),
        TagKind::Textarea => Some("textbox"),
        TagKind::Select => {
            let size = attr("size").and_then(|s| s.trim().parse::<u32>().ok());
            if attr("multiple").is_some() || size.is_some_and(|s| s > 1) {
                Some("listbox")
            } else {
                Some("combobox")
            }
        }
        TagKind::Option => Some("option"),
        TagKind::Heading(_) => Some("heading"),
        TagKind::Ul | TagKind::Ol => Some("list"),
        TagKind::Li => Some("listitem"),
        TagKind::Form => Some("form"),
        TagKind::Img if attr("alt") == Some("") => Some("presentation"),
        TagKind::Img => Some("img"),
        TagKind::Nav => Some("navigation"),
        TagKind::Main => Some("main"),
        TagKind::Header => Some("banner"),
        TagKind::Footer => Some("contentinfo"),
        TagKind::Article => Some("article"),
        TagKind::Aside => Some("complementary"),
        TagKind::Fieldset => Some("group"),
        TagKind::Table => Some("table"),
        TagKind::Tr => Some("row"),
        TagKind::Td => Some("cell"),
        TagKind::Th => Some("columnheader"),
        TagKind::P => Some("paragraph"),
        TagKind::Section => Some("region"),
        _ => None,
    }
}

fn input_role(input_type: Option<&str>) -> Option<&'static str> {
    let input_type = input_type.map(str::to_ascii_lowercase);
    match input_type.as_deref() {
        None | Some("" | "text" | "email" | "tel" | "url") => Some("textbox"),
        Some("search") => Some("searchbox"),
        Some("checkbox") => Some("checkbox"),
        Some("radio") => Some("radio"),
        Some("number") => Some("spinbutton"),
        Some("range") => Some("slider"),
        Some("button" | "submit" | "reset" | "image") => Some("button"),
        _ => None,
    }
}

/// Role after applying an explicit `role` attribute (first token only).
#[must_use]
pub fn effective_role<'a>(
    implicit: Option<&'a str>,
    attributes: &'a BTreeMap<String, String>,
) -> Option<&'a str> {
    attributes
        .get("role")
        .and_then(|r| r.split_whitespace().next())
        .or(implicit)
}

/// Whether a control may be the target of a `<label>`
#[must_use]
pub fn is_labelable(tag: &TagKind, attributes: &BTreeMap<String, String>) -> bool {
    match tag {
        TagKind::Input => !attributes
            .get("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden")),
        TagKind::Textarea | TagKind::Select | TagKind::Button => true,
        TagKind::Other(name) => matches!(name.as_str(), "meter" | "output" | "progress"),
        _ => false,
    }
}

/// Whether the role takes its name from descendant text
#[must_use]
pub fn names_from_content(role: Option<&str>) -> bool {
    role.is_some_and(|r| NAME_FROM_CONTENT_ROLES.contains(&r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    mod implicit_tests {
        use super::*;

        #[test]
        fn test_text_like_inputs_are_textboxes() {
            for ty in ["text", "email", "tel", "url", "TEXT"] {
                assert_eq!(
                    implicit_role(&TagKind::Input, &attrs(&[("type", ty)])),
                    Some("textbox"),
                    "type={ty}"
                );
            }
            assert_eq!(implicit_role(&TagKind::Input, &attrs(&[])), Some("textbox"));
        }

        #[test]
        fn test_password_has_no_role() {
            assert_eq!(
                implicit_role(&TagKind::Input, &attrs(&[("type", "password")])),
                None
            );
        }

        #[test]
        fn test_textarea_shares_textbox_role() {
            assert_eq!(implicit_role(&TagKind::Textarea, &attrs(&[])), Some("textbox"));
        }

        #[test]
        fn test_select_variants() {
            assert_eq!(implicit_role(&TagKind::Select, &attrs(&[])), Some("combobox"));
            assert_eq!(
                implicit_role(&TagKind::Select, &attrs(&[("multiple", "")])),
                Some("listbox")
            );
            assert_eq!(
                implicit_role(&TagKind::Select, &attrs(&[("size", "4")])),
                Some("listbox")
            );
        }

        #[test]
        fn test_anchor_needs_href() {
            assert_eq!(implicit_role(&TagKind::A, &attrs(&[])), None);
            assert_eq!(
                implicit_role(&TagKind::A, &attrs(&[("href", "/home")])),
                Some("link")
            );
        }

        #[test]
        fn test_decorative_image() {
            assert_eq!(
                implicit_role(&TagKind::Img, &attrs(&[("alt", "")])),
                Some("presentation")
            );
            assert_eq!(
                implicit_role(&TagKind::Img, &attrs(&[("alt", "Logo")])),
                Some("img")
            );
        }

        #[test]
        fn test_generic_containers_have_no_role() {
            assert_eq!(implicit_role(&TagKind::Div, &attrs(&[])), None);
            assert_eq!(implicit_role(&TagKind::Label, &attrs(&[])), None);
        }
    }

    mod effective_tests {
        use super::*;

        #[test]
        fn test_explicit_role_overrides() {
            let a = attrs(&[("role", "switch checkbox")]);
            assert_eq!(effective_role(Some("checkbox"), &a), Some("switch"));
        }

        #[test]
        fn test_falls_back_to_implicit() {
            let a = attrs(&[]);
            assert_eq!(effective_role(Some("button"), &a), Some("button"));
            assert_eq!(effective_role(None, &a), None);
        }

        #[test]
        fn test_labelable() {
            assert!(is_labelable(&TagKind::Select, &attrs(&[])));
            assert!(!is_labelable(&TagKind::Input, &attrs(&[("type", "hidden")])));
            assert!(!is_labelable(&TagKind::Div, &attrs(&[])));
            assert!(is_labelable(&TagKind::Other("progress".into()), &attrs(&[])));
        }
    }
}
