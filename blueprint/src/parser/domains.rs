//! Domain table parser (`hcmo-field-inventory.tsv`).

use super::{slug, Column, ColumnIndex, InventoryParser};
use crate::delimited::{Delimiter, Table};
use crate::error::BlueprintError;
use crate::model::{Classification, Group, GroupKind, Inventory};

/// Domain assigned to rows with an empty `domain` cell.
const UNASSIGNED: &str = "unassigned";

/// Parses the tab-separated, domain-grouped field table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainTableParser;

/// `animal_housing` → `Animal Housing`.
fn domain_label(id: &str) -> String {
    id.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl InventoryParser for DomainTableParser {
    fn kind(&self) -> GroupKind {
        GroupKind::Domain
    }

    fn parse(&self, text: &str, origin: &str) -> Result<Inventory, BlueprintError> {
        let table = Table::parse(text, Delimiter::Tab);
        let columns = ColumnIndex::from_header(&table.header);
        let mut groups: Vec<Group> = Vec::new();

        for row in &table.rows {
            let domain = match slug(columns.get(row, Column::Domain)) {
                d if d.is_empty() => UNASSIGNED.to_owned(),
                d => d,
            };
            let classification =
                Classification::parse_lenient(columns.get(row, Column::Classification));
            let Some(field) = columns.field(row, classification, &domain) else {
                continue;
            };
            match groups.iter_mut().find(|g| g.id == domain) {
                Some(group) => {
                    group.add_field(field);
                }
                None => groups.push(Group {
                    label: domain_label(&domain),
                    id: domain,
                    fields: vec![field],
                }),
            }
        }

        if groups.is_empty() {
            return Err(BlueprintError::EmptyInventory(origin.to_owned()));
        }
        Ok(Inventory {
            kind: self.kind(),
            groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "domain\tidentifier\tlabel\tclassification\tontology_iri\n\
system\tsystem_id\tSystem identifier\tmandatory\thcm:System\n\
animal_housing\tcage_id\tCage identifier\tRecommended\thcm:Enclosure\n\
system\tvendor\tVendor\tsomething else\n\
\t\t\t\n\
\tloose\tLoose field\toptional\n";

    #[test]
    fn groups_rows_by_domain_in_first_seen_order() {
        let inventory = DomainTableParser.parse(TSV, "inv.tsv").expect("parses");
        assert_eq!(inventory.kind, GroupKind::Domain);
        let ids: Vec<&str> = inventory.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["system", "animal_housing", UNASSIGNED]);
        assert_eq!(inventory.groups[1].label, "Animal Housing");
        assert_eq!(inventory.groups[0].fields.len(), 2);
        assert_eq!(inventory.field_count(), 4);
    }

    #[test]
    fn classification_is_lenient_and_short_rows_default() {
        let inventory = DomainTableParser.parse(TSV, "inv.tsv").expect("parses");
        let system = inventory.group("system").expect("system group");
        let vendor = system.field("vendor").expect("vendor field");
        assert_eq!(vendor.classification, Classification::Optional);
        assert_eq!(vendor.ontology_iri, "");
        let cage = inventory
            .group("animal_housing")
            .and_then(|g| g.field("cage_id"))
            .expect("cage field");
        assert_eq!(cage.classification, Classification::Recommended);
        assert_eq!(cage.ontology_iri, "hcm:Enclosure");
    }

    #[test]
    fn labels_with_the_same_slug_collapse_to_one_field() {
        let tsv = "domain\tlabel\tclassification\n\
housing\tCage ID\tmandatory\n\
housing\tCage-ID\toptional\n\
animal\tCage ID\toptional\n";
        let inventory = DomainTableParser.parse(tsv, "inv.tsv").expect("parses");
        let housing = inventory.group("housing").expect("housing group");
        assert_eq!(housing.fields.len(), 1);
        assert_eq!(housing.fields[0].label, "Cage ID");
        assert_eq!(housing.fields[0].classification, Classification::Mandatory);
        assert!(inventory.group("animal").and_then(|g| g.field("cage_id")).is_some());
        assert_eq!(inventory.field_count(), 2);
    }

    #[test]
    fn header_only_table_is_empty() {
        assert!(matches!(
            DomainTableParser.parse("domain\tlabel\n", "inv.tsv"),
            Err(BlueprintError::EmptyInventory(_))
        ));
    }
}
