//! Tests for error reporting
//!
//! Every parse failure must carry the right line number and section
//! context, and render a message a user can act on.

#[cfg(test)]
mod tests {
    use crate::coerce::Coercion;
    use crate::error::{IniError, ParseError, ParseErrorKind, SchemaError};
    use crate::parser::Parser;
    use crate::schema::FieldType;

    fn parser() -> Parser {
        let mut p = Parser::new();
        let s = p.add_section("sect");
        s.add_int64("x");
        s.add_bool("b");
        s.add_float64_list("factors");
        p.add_section("other");
        p
    }

    fn parse_err(input: &str) -> ParseError {
        match parser().parse_str(input) {
            Ok(store) => panic!("expected an error, got {:?}", store),
            Err(e) => e,
        }
    }

    #[test]
    fn test_setting_outside_section() {
        let err = parse_err("\n# leading comment\nx = 1\n[sect]\n");
        assert_eq!(err.line, 3);
        assert_eq!(err.section, None);
        assert_eq!(err.section_name(), "");
        assert!(matches!(err.kind, ParseErrorKind::OutsideSection { ref field } if field == "x"));
        assert_eq!(err.to_string(), "line 3: setting x outside section");
        assert_eq!(err.irritant(), "setting x outside section");
    }

    #[test]
    fn test_undefined_section() {
        let err = parse_err("[sect]\nx = 1\n[ zappa ]\n");
        assert_eq!(err.line, 3);
        assert_eq!(err.section.as_deref(), Some("sect"));
        assert!(matches!(err.kind, ParseErrorKind::UndefinedSection { ref name } if name == "zappa"));
    }

    #[test]
    fn test_undefined_section_before_any_header() {
        let err = parse_err("[zappa]\n");
        assert_eq!(err.line, 1);
        assert_eq!(err.section, None);
        assert_eq!(err.to_string(), "line 1: undefined section zappa");
    }

    #[test]
    fn test_no_such_field() {
        let err = parse_err("[other]\nx = 1\n");
        assert_eq!(err.line, 2);
        assert_eq!(err.section.as_deref(), Some("other"));
        assert_eq!(err.to_string(), "line 2 in section other: no such field x");
    }

    #[test]
    fn test_invalid_value() {
        let err = parse_err("[sect]\nb = yes\n");
        assert_eq!(err.line, 2);
        assert_eq!(
            err.to_string(),
            "line 2 in section sect: value 'yes' not valid for field b"
        );
    }

    #[test]
    fn test_invalid_value_reports_preprocessed_text() {
        let err = parse_err("[sect]\nx =  \"12x\"  \n");
        assert!(matches!(err.kind, ParseErrorKind::InvalidValue { ref value, .. } if value == "12x"));
    }

    #[test]
    fn test_invalid_syntax_with_and_without_section() {
        let err = parse_err("garbage\n");
        assert_eq!(err.line, 1);
        assert_eq!(err.section, None);
        assert!(matches!(err.kind, ParseErrorKind::InvalidSyntax));

        let err = parse_err("[sect]\n\nx 1\n");
        assert_eq!(err.line, 3);
        assert_eq!(err.to_string(), "line 3 in section sect: invalid syntax");
    }

    #[test]
    fn test_text_after_list_close_is_invalid_syntax() {
        let err = parse_err("[sect]\nfactors = [1,\n2] 3\n");
        assert_eq!(err.line, 3);
        assert!(matches!(err.kind, ParseErrorKind::InvalidSyntax));
    }

    #[test]
    fn test_unterminated_list_reports_last_line() {
        let err = parse_err("[sect]\nfactors = [\n1, 2,\n\n# still open\n");
        assert_eq!(err.line, 5);
        assert_eq!(
            err.to_string(),
            "line 5 in section sect: unterminated list for field factors"
        );
    }

    #[test]
    fn test_first_error_wins() {
        let err = parse_err("[sect]\nx = bad\ny = 2\n[zappa]\n");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = parser().parse_file("/nonexistent/path/to/config.ini");
        assert!(matches!(result, Err(IniError::Io(_))));
    }

    #[test]
    fn test_schema_error_messages() {
        let err = SchemaError::DuplicateSection {
            name: "sect".to_string(),
        };
        assert_eq!(err.to_string(), "duplicated section name sect");

        let mut p = parser();
        let err = p
            .section_mut("sect")
            .map(|s| s.try_add("x", FieldType::String, "", Coercion::String))
            .and_then(Result::err);
        assert!(matches!(err, Some(SchemaError::DuplicateField { .. })));
    }
}
