//! Row Transformer
//!
//! Rewrites the user and author identifier columns of each input row from a
//! [`MappingTable`] and prepends a 1-based sequence number.
//!
//! ```text
//! input : [ _ , user_id , user_name , author_id , author_name , rest... ]
//! output: [ n , user.id , user.name , author.id , author.name , rest... ]
//! ```
//!
//! Unmapped identifiers pass through: the id slot keeps the raw identifier
//! and the name slot is filled according to [`NameFallback`].

use crate::config::{
    NameFallback, AUTHOR_ID_COLUMN, AUTHOR_NAME_COLUMN, REQUIRED_COLUMNS, USER_ID_COLUMN,
    USER_NAME_COLUMN,
};
use crate::error::RowError;
use crate::mapping::MappingTable;

/// A transformed row plus which lookups hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedRow {
    pub fields: Vec<String>,
    pub user_mapped: bool,
    pub author_mapped: bool,
}

/// Applies a mapping table to input rows
#[derive(Debug, Clone, Copy)]
pub struct RowTransformer<'m> {
    table: &'m MappingTable,
    name_fallback: NameFallback,
}

impl<'m> RowTransformer<'m> {
    pub fn new(table: &'m MappingTable) -> Self {
        Self {
            table,
            name_fallback: NameFallback::default(),
        }
    }

    pub fn with_name_fallback(mut self, name_fallback: NameFallback) -> Self {
        self.name_fallback = name_fallback;
        self
    }

    /// Transform the row at zero-based `index`.
    pub fn remap<S: AsRef<str>>(&self, index: usize, row: &[S]) -> Result<RemappedRow, RowError> {
        if row.len() < REQUIRED_COLUMNS {
            return Err(RowError::TooFewColumns {
                row: index + 1,
                found: row.len(),
                required: REQUIRED_COLUMNS,
            });
        }

        let user_id = row[USER_ID_COLUMN].as_ref();
        let author_id = row[AUTHOR_ID_COLUMN].as_ref();

        let user = self.table.lookup(user_id);
        let author = self.table.lookup(author_id);

        let (user_name, author_name) = match self.name_fallback {
            NameFallback::Identifier => (user_id, author_id),
            NameFallback::Column => (
                row[USER_NAME_COLUMN].as_ref(),
                row[AUTHOR_NAME_COLUMN].as_ref(),
            ),
        };

        let mut fields = Vec::with_capacity(row.len());
        fields.push((index + 1).to_string());
        fields.push(user.id_or(user_id).to_string());
        fields.push(user.name_or(user_name).to_string());
        fields.push(author.id_or(author_id).to_string());
        fields.push(author.name_or(author_name).to_string());
        fields.extend(row[REQUIRED_COLUMNS..].iter().map(|f| f.as_ref().to_string()));

        Ok(RemappedRow {
            fields,
            user_mapped: user.is_mapped(),
            author_mapped: author.is_mapped(),
        })
    }

    /// Transform the row at zero-based `index`, keeping only the fields.
    pub fn transform_row<S: AsRef<str>>(&self, index: usize, row: &[S]) -> Result<Vec<String>, RowError> {
        self.remap(index, row).map(|r| r.fields)
    }

    /// Lazily transform rows in order, numbering them from 1.
    pub fn transform_rows<'a, I, R>(
        &'a self,
        rows: I,
    ) -> impl Iterator<Item = Result<Vec<String>, RowError>> + 'a
    where
        I: IntoIterator<Item = R>,
        I::IntoIter: 'a,
        R: AsRef<[String]> + 'a,
    {
        let transformer: RowTransformer<'a> = *self;
        rows.into_iter()
            .enumerate()
            .map(move |(index, row)| transformer.transform_row(index, row.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MappingEntry;
    use proptest::prelude::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn alice_table() -> MappingTable {
        MappingTable::from_json(r#"{"u1": {"id": "100", "name": "Alice"}}"#).unwrap()
    }

    #[test]
    fn test_mapped_user_unmapped_author() {
        let table = alice_table();
        let transformer = RowTransformer::new(&table);

        let out = transformer
            .transform_row(0, &["x", "u1", "ignored", "a9", "ignoredAuthor"])
            .unwrap();

        assert_eq!(out, row(&["1", "100", "Alice", "a9", "ignoredAuthor"]));
    }

    #[test]
    fn test_identifier_fallback_repeats_identifier() {
        let table = alice_table();
        let transformer = RowTransformer::new(&table).with_name_fallback(NameFallback::Identifier);

        let out = transformer
            .transform_row(0, &["x", "u1", "ignored", "a9", "ignoredAuthor"])
            .unwrap();

        assert_eq!(out, row(&["1", "100", "Alice", "a9", "a9"]));
    }

    #[test]
    fn test_both_mapped() {
        let table = MappingTable::from_json(
            r#"{"u1": {"id": "100", "name": "Alice"}, "a9": {"id": "900", "name": "Zed"}}"#,
        )
        .unwrap();
        let transformer = RowTransformer::new(&table);

        let out = transformer.transform_row(4, &["x", "u1", "", "a9", ""]).unwrap();
        assert_eq!(out, row(&["5", "100", "Alice", "900", "Zed"]));
    }

    #[test]
    fn test_same_key_for_user_and_author() {
        let table = alice_table();
        let remapped = RowTransformer::new(&table)
            .remap(0, &["x", "u1", "", "u1", ""])
            .unwrap();

        assert!(remapped.user_mapped);
        assert!(remapped.author_mapped);
        assert_eq!(remapped.fields, row(&["1", "100", "Alice", "100", "Alice"]));
    }

    #[test]
    fn test_trailing_columns_preserved() {
        let table = alice_table();
        let out = RowTransformer::new(&table)
            .transform_row(0, &["x", "u1", "n", "a9", "m", "tail1", "", "tail3"])
            .unwrap();

        assert_eq!(&out[5..], &["tail1", "", "tail3"]);
    }

    #[test]
    fn test_first_column_replaced_by_sequence() {
        let table = MappingTable::default();
        let out = RowTransformer::new(&table)
            .transform_row(41, &["original", "u", "n", "a", "m"])
            .unwrap();

        assert_eq!(out[0], "42");
        assert!(!out.contains(&"original".to_string()));
    }

    #[test]
    fn test_too_few_columns() {
        let table = alice_table();
        let err = RowTransformer::new(&table)
            .transform_row(2, &["x", "u1", "n", "a9"])
            .unwrap_err();

        assert_eq!(err, RowError::TooFewColumns { row: 3, found: 4, required: 5 });
    }

    #[test]
    fn test_transform_rows_is_lazy_and_ordered() {
        let table = alice_table();
        let transformer = RowTransformer::new(&table);
        let rows = vec![
            row(&["a", "u1", "", "b", ""]),
            row(&["short"]),
            row(&["c", "u2", "", "d", ""]),
        ];

        let mut iter = transformer.transform_rows(&rows);
        assert_eq!(iter.next().unwrap().unwrap()[0], "1");
        assert!(iter.next().unwrap().is_err());
        let third = iter.next().unwrap().unwrap();
        assert_eq!(third, row(&["3", "u2", "", "d", ""]));
        assert!(iter.next().is_none());
    }

    // ========================================================================
    // Properties over generated tables and rows
    // ========================================================================

    fn arb_key() -> impl Strategy<Value = String> {
        prop_oneof!["k[0-3]", "[a-z]{1,3}"]
    }

    fn arb_row() -> impl Strategy<Value = Vec<String>> {
        (prop::collection::vec("[a-z0-9 ]{0,6}", 5..9), arb_key(), arb_key()).prop_map(
            |(mut fields, user, author)| {
                fields[USER_ID_COLUMN] = user;
                fields[AUTHOR_ID_COLUMN] = author;
                fields
            },
        )
    }

    fn arb_table() -> impl Strategy<Value = MappingTable> {
        prop::collection::hash_map("k[0-3]", ("[0-9]{1,3}", "[A-Z][a-z]{0,5}"), 0..4).prop_map(
            |entries| {
                entries
                    .into_iter()
                    .map(|(key, (id, name))| (key, MappingEntry::new(id, name)))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_one_numbered_row_per_input(
            table in arb_table(),
            rows in prop::collection::vec(arb_row(), 0..20),
        ) {
            let transformer = RowTransformer::new(&table);
            let out: Vec<Vec<String>> = transformer
                .transform_rows(&rows)
                .collect::<Result<_, _>>()
                .unwrap();

            prop_assert_eq!(out.len(), rows.len());
            for (i, fields) in out.iter().enumerate() {
                prop_assert_eq!(&fields[0], &(i + 1).to_string());
            }
        }

        #[test]
        fn prop_lookup_or_passthrough(table in arb_table(), input in arb_row()) {
            let out = RowTransformer::new(&table)
                .with_name_fallback(NameFallback::Identifier)
                .transform_row(0, &input)
                .unwrap();

            for (id_col, out_id, out_name) in [(USER_ID_COLUMN, 1, 2), (AUTHOR_ID_COLUMN, 3, 4)] {
                let key = &input[id_col];
                match table.get(key) {
                    Some(entry) => {
                        prop_assert_eq!(&out[out_id], &entry.id);
                        prop_assert_eq!(&out[out_name], &entry.name);
                    }
                    None => {
                        prop_assert_eq!(&out[out_id], key);
                        prop_assert_eq!(&out[out_name], key);
                    }
                }
            }
        }

        #[test]
        fn prop_column_fallback_keeps_name_columns(table in arb_table(), input in arb_row()) {
            let out = RowTransformer::new(&table).transform_row(0, &input).unwrap();

            for (id_col, name_col) in [(USER_ID_COLUMN, USER_NAME_COLUMN), (AUTHOR_ID_COLUMN, AUTHOR_NAME_COLUMN)] {
                let key = &input[id_col];
                match table.get(key) {
                    Some(entry) => {
                        prop_assert_eq!(&out[id_col], &entry.id);
                        prop_assert_eq!(&out[name_col], &entry.name);
                    }
                    None => {
                        prop_assert_eq!(&out[id_col], key);
                        prop_assert_eq!(&out[name_col], &input[name_col]);
                    }
                }
            }
        }

        #[test]
        fn prop_trailing_fields_unchanged(table in arb_table(), input in arb_row()) {
            let out = RowTransformer::new(&table).transform_row(0, &input).unwrap();

            prop_assert_eq!(out.len(), input.len());
            prop_assert_eq!(&out[REQUIRED_COLUMNS..], &input[REQUIRED_COLUMNS..]);
        }
    }
}
