#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use weightlog_webhook::measurement::{format_history, MeasurementRecord};

    fn record(
        weight: f64,
        body_fat: Option<f64>,
        body_water: Option<f64>,
        body_muscle: Option<f64>,
    ) -> MeasurementRecord {
        MeasurementRecord {
            date: NaiveDate::from_ymd_opt(2023, 11, 15).unwrap(),
            weight,
            body_fat,
            body_water,
            body_muscle,
        }
    }

    #[test]
    fn test_row_column_order_is_fixed() {
        let row = record(65.2, Some(20.1), Some(55.0), Some(42.3)).to_row();
        assert_eq!(
            row,
            vec![
                json!("2023-11-15"),
                json!(65.2),
                json!(20.1),
                json!(55.0),
                json!(42.3),
            ]
        );
    }

    #[test]
    fn test_absent_fields_are_empty_strings_not_nulls() {
        let row = record(65.2, None, Some(55.0), None).to_row();
        assert_eq!(row[2], json!(""));
        assert_eq!(row[4], json!(""));
        assert!(!row.iter().any(|cell| cell.is_null()));
    }

    #[test]
    fn test_round_trip_preserves_field_values() {
        let cases = [
            record(65.2, None, None, None),
            record(65.2, Some(20.1), None, None),
            record(65.2, None, Some(55.0), None),
            record(65.2, Some(20.1), Some(55.0), Some(42.3)),
        ];
        for original in cases {
            let restored = MeasurementRecord::from_row(&original.to_row()).unwrap();
            assert_eq!(restored, original);
        }
    }

    #[test]
    fn test_history_line_per_populated_row() {
        let rows = vec![
            vec![json!("2023-11-14"), json!(66.0), json!(20.5)],
            vec![json!("2023-11-15"), json!(65.2), json!(20.1), json!(55.0), json!(42.3)],
        ];
        let lines = format_history(&rows);
        assert_eq!(
            lines,
            vec![
                "2023-11-14: weight=66.0, body_fat=20.5, body_water=-, muscle=-",
                "2023-11-15: weight=65.2, body_fat=20.1, body_water=55.0, muscle=42.3",
            ]
        );
    }

    #[test]
    fn test_history_skips_rows_below_two_populated_cells() {
        let rows = vec![
            vec![],
            vec![json!("2023-11-15")],
            vec![json!(""), json!("")],
            vec![json!("2023-11-15"), json!("")],
        ];
        assert!(format_history(&rows).is_empty());
    }

    #[test]
    fn test_history_placeholder_for_blank_cells() {
        let rows = vec![vec![
            json!("2023-11-15"),
            json!(65.2),
            json!("   "),
            json!(55.0),
        ]];
        let lines = format_history(&rows);
        assert_eq!(
            lines,
            vec!["2023-11-15: weight=65.2, body_fat=-, body_water=55.0, muscle=-"]
        );
    }

    #[test]
    fn test_history_handles_string_cells_from_user_entered_rows() {
        // Rows written manually in the sheet come back as strings
        let rows = vec![vec![json!("2023-11-13"), json!("64.8"), json!("19.9")]];
        let lines = format_history(&rows);
        assert_eq!(
            lines,
            vec!["2023-11-13: weight=64.8, body_fat=19.9, body_water=-, muscle=-"]
        );
    }
}
