#[cfg(test)]
mod tests {
    use crate::core::{parse_timestamp, Cell, Row, RowKey, Table, Value};
    use crate::parsing::csv_parser::{
        parse_table_csv, parse_table_csv_str, table_to_csv_string, CsvOptions,
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to create a temp CSV file
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_parse_table_csv_basic() {
        let csv_content = "time,A,B,C\n\
            2019-04-02 11:00:00,1.0,2.0,\n\
            2019-04-02 12:00:00,3.0,NaN,4.0\n";

        let temp_file = create_temp_csv(csv_content);
        let result = parse_table_csv(temp_file.path(), &CsvOptions::default());

        assert!(result.is_ok(), "Should parse basic CSV: {:?}", result.err());
        let table = result.unwrap();
        assert_eq!(table.label.as_deref(), Some("time"));
        assert_eq!(table.columns, vec!["A", "B", "C"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows[0].key,
            RowKey::Timestamp(parse_timestamp("2019-04-02 11:00:00").unwrap())
        );
        assert_eq!(table.rows[0].cells[2], Cell::Missing);
        assert_eq!(table.rows[1].cells[1], Cell::Missing);
        assert_eq!(table.rows[1].cells[2], Cell::present(4.0));
    }

    #[test]
    fn test_unnamed_key_column_has_no_label() {
        let table = parse_table_csv_str(",v\n1,a\n2,b\n", &CsvOptions::default()).unwrap();

        assert!(table.label.is_none());
        assert_eq!(table.rows[1].key, RowKey::Int(2));
        assert_eq!(table.rows[1].cells[0], Cell::Present(Value::Text("b".into())));
    }

    #[test]
    fn test_literal_types() {
        let table = parse_table_csv_str(
            "id,i,f,b,s\nx1,42,2.5,true,north\n",
            &CsvOptions::default(),
        )
        .unwrap();

        assert_eq!(table.rows[0].key, RowKey::Text("x1".into()));
        assert_eq!(
            table.rows[0].cells,
            vec![
                Cell::present(42),
                Cell::present(2.5),
                Cell::present(true),
                Cell::present("north"),
            ]
        );
    }

    #[test]
    fn test_custom_delimiter_and_missing_tokens() {
        let options = CsvOptions {
            delimiter: b';',
            missing_tokens: vec!["-".to_string()],
        };
        let table = parse_table_csv_str("k;a;b\n1;-;\n", &options).unwrap();

        assert_eq!(table.rows[0].cells[0], Cell::Missing);
        // Empty is not a missing token here
        assert_eq!(table.rows[0].cells[1], Cell::present(""));
    }

    #[test]
    fn test_wrong_field_count_is_rejected() {
        let err = parse_table_csv_str("k,a,b\n1,2\n", &CsvOptions::default()).unwrap_err();
        assert!(err.to_string().contains("line 2"), "got: {}", err);
    }

    #[test]
    fn test_missing_row_key_is_rejected() {
        let err = parse_table_csv_str("k,a\n,2\n", &CsvOptions::default()).unwrap_err();
        assert!(err.to_string().contains("no row-key"), "got: {}", err);
    }

    #[test]
    fn test_missing_file() {
        let result = parse_table_csv(
            std::path::Path::new("/nonexistent/table.csv"),
            &CsvOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_write_then_read_back() {
        let source = "time,A,B\n\
            2019-04-02 11:00:00,1.0,\n\
            2019-04-02 12:00:00,2,north\n";
        let options = CsvOptions::default();
        let table = parse_table_csv_str(source, &options).unwrap();

        let written = table_to_csv_string(&table, &options).unwrap();
        assert!(written.starts_with("time,A,B\n"));
        assert!(written.contains("2019-04-02 11:00:00,1.0,\n"));

        let reread = parse_table_csv_str(&written, &options).unwrap();
        assert_eq!(reread, table);
    }

    #[test]
    fn test_integral_floats_stay_floats() {
        let table = Table::new(
            ["a", "b"],
            vec![
                Row::new(1, vec![Cell::present(1.0), Cell::present(3)]),
                Row::new(2, vec![Cell::present(1.5), Cell::present(-2.0)]),
            ],
        )
        .with_label("k");
        let options = CsvOptions::default();

        let written = table_to_csv_string(&table, &options).unwrap();
        assert_eq!(written, "k,a,b\n1,1.0,3\n2,1.5,-2.0\n");

        let reread = parse_table_csv_str(&written, &options).unwrap();
        assert_eq!(reread, table);
    }

    #[test]
    fn test_write_without_label() {
        let table = Table::new(["v"], vec![]);
        let written = table_to_csv_string(&table, &CsvOptions::default()).unwrap();
        assert_eq!(written, ",v\n");
    }
}
