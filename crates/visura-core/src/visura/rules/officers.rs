//! Company officers.

use tracing::trace;

use crate::models::visura::Officer;

use super::{normalize_whitespace, FieldExtractor, FieldRules};

/// Text that follows a name in officer listings and is not part of it.
const NAME_TERMINATORS: [&str; 6] = [" nato", " nata", " codice", " c.f.", " residente", " domicilio"];

/// Cut a captured name at the first birth, fiscal code or residence note.
pub fn clean_officer_name(raw: &str) -> String {
    let name = normalize_whitespace(raw);
    let lower = name.to_ascii_lowercase();

    let end = NAME_TERMINATORS
        .iter()
        .filter_map(|t| lower.find(t))
        .min()
        .unwrap_or(name.len());

    name[..end].trim_end_matches([' ', '.', ',']).to_string()
}

/// Officer extractor over role-tagged rules.
///
/// Every match of every rule becomes an entry; the same person found under
/// two roles is reported twice.
pub struct OfficerExtractor<'a> {
    rules: &'a FieldRules,
}

impl<'a> OfficerExtractor<'a> {
    pub fn new(rules: &'a FieldRules) -> Self {
        Self { rules }
    }
}

impl FieldExtractor for OfficerExtractor<'_> {
    type Output = Officer;

    fn extract(&self, text: &str) -> Option<Officer> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Officer> {
        let mut officers = Vec::new();

        for rule in self.rules.rules() {
            let Some(role) = rule.role() else {
                continue;
            };

            for m in rule.matches(text) {
                let Some(raw) = m.value() else {
                    continue;
                };

                let full_name = clean_officer_name(raw);
                if full_name.chars().count() <= 3 {
                    trace!(%role, name = %full_name, "officer name too short");
                    continue;
                }

                officers.push(Officer { full_name, role });
            }
        }

        officers
    }
}

pub fn extract_officers(text: &str, rules: &FieldRules) -> Vec<Officer> {
    OfficerExtractor::new(rules).extract_all(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::visura::OfficerRole;
    use crate::visura::rules::DEFAULT_LIBRARY;
    use pretty_assertions::assert_eq;

    fn officers(text: &str) -> Vec<Officer> {
        extract_officers(text, &DEFAULT_LIBRARY.officers)
    }

    #[test]
    fn test_clean_officer_name() {
        assert_eq!(clean_officer_name("ROSSI MARIO nato a ROMA il "), "ROSSI MARIO");
        assert_eq!(clean_officer_name("Bianchi Anna C.F. BNC"), "Bianchi Anna");
        assert_eq!(clean_officer_name("  Verdi   Luca "), "Verdi Luca");
    }

    #[test]
    fn test_roles_are_attached_by_rule() {
        let text = "Amministratore Unico: ROSSI MARIO nato a ROMA il 01/01/1970\n\
                    Consigliere: Bianchi Anna";
        assert_eq!(
            officers(text),
            vec![
                Officer {
                    full_name: "ROSSI MARIO".to_string(),
                    role: OfficerRole::SoleDirector,
                },
                Officer {
                    full_name: "Bianchi Anna".to_string(),
                    role: OfficerRole::BoardMember,
                },
            ]
        );
    }

    #[test]
    fn test_board_chair_variants() {
        let found = officers("Presidente del Consiglio di Amministrazione: Verdi Luca");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].role, OfficerRole::BoardChair);
        assert_eq!(found[0].full_name, "Verdi Luca");
    }

    #[test]
    fn test_same_person_under_two_roles_is_kept_twice() {
        let text = "Presidente CdA: Neri Paolo\nAmministratore Delegato: Neri Paolo";
        let found = officers(text);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].role, OfficerRole::BoardChair);
        assert_eq!(found[1].role, OfficerRole::ManagingDirector);
    }

    #[test]
    fn test_short_or_placeholder_names_are_dropped() {
        assert!(officers("Amministratore unico: N/D").is_empty());
        assert!(officers("Consigliere: Bo").is_empty());
    }
}
