#[cfg(test)]
mod tests {
    use crate::core::{parse_timestamp, Cell, ConstantMap, Row, RowKey, Table};
    use crate::parsing::json_parser::{
        constants_to_json, parse_table_json, parse_table_json_str, table_to_json,
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE_JSON: &str = r#"{
        "label": "time",
        "columns": ["A", "B", "C"],
        "rows": [
            {"key": "2019-04-02 11:00:00", "cells": [1.0, 2.0, null]},
            {"key": "2019-04-02 11:00:00", "cells": [3.0, null, 4.0]},
            {"key": "2019-04-02 12:00:00", "cells": [null, 5, "north"]}
        ]
    }"#;

    /// Helper to create a temp JSON file
    fn create_temp_json(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_parse_table_json_file() {
        let temp_file = create_temp_json(TABLE_JSON);
        let result = parse_table_json(temp_file.path());

        assert!(result.is_ok(), "Should parse table JSON: {:?}", result.err());
        let table = result.unwrap();
        assert_eq!(table.label.as_deref(), Some("time"));
        assert_eq!(table.columns, vec!["A", "B", "C"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(
            table.rows[2].key,
            RowKey::Timestamp(parse_timestamp("2019-04-02 12:00:00").unwrap())
        );
        assert_eq!(
            table.rows[2].cells,
            vec![Cell::Missing, Cell::present(5), Cell::present("north")]
        );
    }

    #[test]
    fn test_integer_keys_and_defaults() {
        let table =
            parse_table_json_str(r#"{"columns": ["v"], "rows": [{"key": 3, "cells": [true]}]}"#)
                .unwrap();

        assert!(table.label.is_none());
        assert_eq!(table.rows[0].key, RowKey::Int(3));
        assert_eq!(table.rows[0].cells, vec![Cell::present(true)]);

        let empty = parse_table_json_str(r#"{"columns": ["v"]}"#).unwrap();
        assert_eq!(empty.row_count(), 0);
    }

    #[test]
    fn test_error_reports_path() {
        let err = parse_table_json_str(r#"{"columns": ["v"], "rows": [{"key": 1, "cells": 7}]}"#)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("rows[0].cells"), "got: {}", message);
    }

    #[test]
    fn test_nested_cell_is_rejected() {
        let err = parse_table_json_str(
            r#"{"columns": ["v"], "rows": [{"key": 1, "cells": [[1, 2]]}]}"#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("scalars"));
    }

    #[test]
    fn test_bad_key_is_rejected() {
        let result =
            parse_table_json_str(r#"{"columns": [], "rows": [{"key": 1.5, "cells": []}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_write_then_read_back() {
        let table = Table::new(
            ["A", "B"],
            vec![
                Row::new(1, vec![Cell::present(1.5), Cell::Missing]),
                Row::new(2, vec![Cell::present(2.0), Cell::present("x")]),
            ],
        )
        .with_label("n");

        let json = table_to_json(&table).unwrap();
        let reread = parse_table_json_str(&json).unwrap();
        assert_eq!(reread, table);
    }

    #[test]
    fn test_constants_to_json() {
        let constants: ConstantMap = vec![
            ("index.name", Cell::present("time")),
            ("site", Cell::present("north")),
            ("gap", Cell::Missing),
        ]
        .into_iter()
        .collect();

        let json = constants_to_json(&constants).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({"gap": null, "index.name": "time", "site": "north"})
        );
    }
}
