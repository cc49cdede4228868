//! Tier document parser (`FIELD-TIERS.md`).
//!
//! Every heading that names Mandatory, Recommended or Optional opens that
//! tier; the first table after it lists the tier's fields. Headings nested
//! deeper than the tier heading keep the tier open, any other heading
//! closes it.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::{ColumnIndex, InventoryParser};
use crate::error::BlueprintError;
use crate::model::{Classification, Group, GroupKind, Inventory};

/// Parses the tiered Markdown field document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierDocumentParser;

#[derive(Debug, Default)]
struct TableBuffer {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

#[derive(Debug, Clone, Copy)]
struct OpenTier {
    classification: Classification,
    level: HeadingLevel,
    table_taken: bool,
}

impl InventoryParser for TierDocumentParser {
    fn kind(&self) -> GroupKind {
        GroupKind::Tier
    }

    fn parse(&self, text: &str, origin: &str) -> Result<Inventory, BlueprintError> {
        let mut groups: Vec<Group> = Vec::new();
        let mut tier: Option<OpenTier> = None;
        let mut heading: Option<(HeadingLevel, String)> = None;
        let mut table: Option<TableBuffer> = None;

        for event in Parser::new_ext(text, Options::ENABLE_TABLES) {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((level, String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    let Some((level, title)) = heading.take() else {
                        continue;
                    };
                    let title = title.trim().to_owned();
                    match Classification::find_in(&title) {
                        Some(classification) => {
                            tier = Some(OpenTier {
                                classification,
                                level,
                                table_taken: false,
                            });
                            if !groups.iter().any(|g| g.id == classification.as_str()) {
                                groups.push(Group {
                                    id: classification.as_str().to_owned(),
                                    label: title,
                                    fields: Vec::new(),
                                });
                            }
                        }
                        None => {
                            if tier.is_some_and(|t| level <= t.level) {
                                tier = None;
                            }
                        }
                    }
                }
                Event::Start(Tag::Table(_)) => table = Some(TableBuffer::default()),
                Event::Start(Tag::TableCell) => {
                    if let Some(t) = table.as_mut() {
                        t.cell.clear();
                    }
                }
                Event::End(TagEnd::TableCell) => {
                    if let Some(t) = table.as_mut() {
                        let cell = std::mem::take(&mut t.cell).trim().to_owned();
                        t.row.push(cell);
                    }
                }
                Event::End(TagEnd::TableHead) => {
                    if let Some(t) = table.as_mut() {
                        t.header = std::mem::take(&mut t.row);
                    }
                }
                Event::End(TagEnd::TableRow) => {
                    if let Some(t) = table.as_mut() {
                        let row = std::mem::take(&mut t.row);
                        t.rows.push(row);
                    }
                }
                Event::End(TagEnd::Table) => {
                    let Some(done) = table.take() else { continue };
                    let Some(open) = tier.as_mut().filter(|t| !t.table_taken) else {
                        continue;
                    };
                    open.table_taken = true;
                    let classification = open.classification;
                    let columns = ColumnIndex::from_header(&done.header);
                    if let Some(group) =
                        groups.iter_mut().find(|g| g.id == classification.as_str())
                    {
                        let group_id = group.id.clone();
                        for field in done
                            .rows
                            .iter()
                            .filter_map(|row| columns.field(row, classification, &group_id))
                        {
                            group.add_field(field);
                        }
                    }
                }
                Event::Text(s) | Event::Code(s) => {
                    if let Some(t) = table.as_mut() {
                        t.cell.push_str(&s);
                    } else if let Some((_, title)) = heading.as_mut() {
                        title.push_str(&s);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some(t) = table.as_mut() {
                        t.cell.push(' ');
                    }
                }
                _ => {}
            }
        }

        groups.retain(|g| !g.fields.is_empty());
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

    const DOC: &str = "\
# Field tiers

Intro paragraph.

## Mandatory fields

| Field | Description | Example value |
|-------|-------------|---------------|
| System identifier | Short name of the system | `hcmo-system-001` |
| Animal identifier | Subject id | S-00123 |

## Recommended fields

### Housing

| Field | Rationale |
|-------|-----------|
| Enclosure dimensions | Space allowance |

| Field |
|-------|
| Ignored second table |

## Notes

| Field |
|-------|
| Not a tier field |

## Optional fields

| Identifier | Label |
|------------|-------|
| operator-contact | Operator contact |
";

    #[test]
    fn parses_three_tiers() {
        let inventory = TierDocumentParser.parse(DOC, "doc").expect("parses");
        assert_eq!(inventory.kind, GroupKind::Tier);
        let ids: Vec<&str> = inventory.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["mandatory", "recommended", "optional"]);
        assert_eq!(inventory.groups[0].label, "Mandatory fields");

        let mandatory = &inventory.groups[0];
        assert_eq!(mandatory.fields.len(), 2);
        assert_eq!(mandatory.fields[0].id, "system_identifier");
        assert_eq!(mandatory.fields[0].example_value, "hcmo-system-001");
        assert_eq!(mandatory.fields[0].rationale, "");

        let recommended = &inventory.groups[1];
        assert_eq!(recommended.fields.len(), 1);
        assert_eq!(recommended.fields[0].rationale, "Space allowance");

        let optional = &inventory.groups[2];
        assert_eq!(optional.fields[0].id, "operator_contact");
        assert_eq!(optional.fields[0].label, "Operator contact");
        assert_eq!(inventory.field_count(), 4);
    }

    #[test]
    fn fields_carry_their_tier() {
        let inventory = TierDocumentParser.parse(DOC, "doc").expect("parses");
        for group in &inventory.groups {
            for field in &group.fields {
                assert_eq!(field.classification.as_str(), group.id);
                assert_eq!(field.group_id, group.id);
            }
        }
    }

    #[test]
    fn duplicate_field_ids_within_a_tier_are_skipped() {
        let doc = "## Mandatory\n\n| Field |\n|---|\n| Cage ID |\n| Cage-ID |\n| Animal ID |\n";
        let inventory = TierDocumentParser.parse(doc, "doc").expect("parses");
        let ids: Vec<&str> = inventory.groups[0].fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["cage_id", "animal_id"]);
    }

    #[test]
    fn document_without_tier_tables_is_empty() {
        let err = TierDocumentParser
            .parse("# Title\n\nNo tables here.\n", "empty.md")
            .expect_err("must fail");
        assert_eq!(err.to_string(), "No blueprint fields found in empty.md");
    }
}
