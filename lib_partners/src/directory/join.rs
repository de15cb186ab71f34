//! Left outer join of partners with their solutions on a normalized name key.

use super::models::{PartnerSolution, RawPartner, RawSolution, Solution};
use std::collections::HashMap;

/// Join key: trimmed and lower-cased; a missing name normalizes to `""`.
pub fn normalize_name(name: Option<&str>) -> String {
    name.map(|n| n.trim().to_lowercase()).unwrap_or_default()
}

/// Emits one `PartnerSolution` per partner, in input order, each carrying every
/// solution whose normalized partner name matches, in input order.
///
/// Solutions with a missing or blank partner name are never attached. Partners
/// sharing a name each receive the full matching set. A partner with a blank
/// name normalizes to `""`, which no solution key can equal because blank
/// solution names are skipped under the same trim.
pub fn join(partners: &[RawPartner], solutions: &[RawSolution]) -> Vec<PartnerSolution> {
    let mut by_partner: HashMap<String, Vec<Solution>> = HashMap::new();
    for raw in solutions {
        let Some(name) = raw.partner_name.as_deref() else {
            continue;
        };
        if name.trim().is_empty() {
            continue;
        }
        by_partner
            .entry(normalize_name(Some(name)))
            .or_default()
            .push(Solution::from(raw));
    }

    partners
        .iter()
        .map(|partner| PartnerSolution {
            partner_name: partner.name.clone(),
            partner_id: partner.id.clone(),
            partner_level: partner.partner_level.clone(),
            partner_type: partner.partner_type.clone(),
            short_description: partner.short_description.clone(),
            company_overview: partner.company_overview.clone(),
            solutions: by_partner
                .get(&normalize_name(partner.name.as_deref()))
                .cloned()
                .unwrap_or_default(),
        })
        .collect()
}
