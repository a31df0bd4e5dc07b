#[cfg(test)]
mod __test__ {
  use crate::event::{EventMetadata, Level, LogPayload};
  use crate::formatter::EventFormat;

  fn meta() -> EventMetadata {
    EventMetadata::new("2024-05-01 10:00:00.000", Level::Info, "app::auth", "login", 12)
  }

  fn fields() -> Vec<(String, String)> {
    vec![
      ("user".to_string(), "bob".to_string()),
      ("action".to_string(), "login".to_string()),
    ]
  }

  #[test]
  fn test_default_message() {
    let out = EventFormat::Default.format_message(&meta(), "hello");
    assert_eq!(out, "[2024-05-01 10:00:00.000] INFO app::auth login 12: hello\n");
  }

  #[test]
  fn test_default_fields() {
    let out = EventFormat::Default.format_fields(&meta(), &fields());
    assert_eq!(
      out,
      "[2024-05-01 10:00:00.000] INFO app::auth login 12: user=\"bob\" action=\"login\"\n"
    );
  }

  #[test]
  fn test_kv_message() {
    let out = EventFormat::Kv.format_message(&meta(), "hello");
    assert_eq!(
      out,
      "time=\"2024-05-01 10:00:00.000\" level=\"INFO\" class=\"app::auth\" method=\"login\" line=\"12\" message=\"hello\"\n"
    );
  }

  #[test]
  fn test_kv_escapes_quotes() {
    let out = EventFormat::Kv.format_message(&meta(), "say \"hi\"");
    assert!(out.contains("message=\"say \\\"hi\\\"\""));
  }

  #[test]
  fn test_csv_drops_keys() {
    let out = EventFormat::Csv.format_fields(&meta(), &fields());
    assert_eq!(out, "2024-05-01 10:00:00.000,INFO,app::auth,login,12,bob,login\n");
  }

  #[test]
  fn test_csv_quotes_commas() {
    let out = EventFormat::Csv.format_message(&meta(), "a,b");
    assert!(out.ends_with(",\"a,b\"\n"));
  }

  #[test]
  fn test_xml_message() {
    let out = EventFormat::Xml.format_message(&meta(), "x < y");
    assert_eq!(
      out,
      "<event><time>2024-05-01 10:00:00.000</time><level>INFO</level><class>app::auth</class><method>login</method><line>12</line><message>x &lt; y</message></event>\n"
    );
  }

  #[test]
  fn test_xml_fields_one_child_per_key() {
    let out = EventFormat::Xml.format_fields(&meta(), &fields());
    assert!(out.contains("<user>bob</user><action>login</action></event>\n"));
    assert!(!out.contains("<message>"));
  }

  #[test]
  fn test_json_field_overrides_metadata_key() {
    let fields = vec![
      ("level".to_string(), "custom".to_string()),
      ("user".to_string(), "bob".to_string()),
    ];
    let out = EventFormat::Json.format_fields(&meta(), &fields);
    assert_eq!(out.matches("\"level\"").count(), 1, "{}", out);
    assert_eq!(
      out,
      "{\"time\":\"2024-05-01 10:00:00.000\",\"class\":\"app::auth\",\"method\":\"login\",\"line\":\"12\",\"level\":\"custom\",\"user\":\"bob\"}\n"
    );
  }

  #[test]
  fn test_json_message_keeps_order() {
    let out = EventFormat::Json.format_message(&meta(), "hello");
    assert_eq!(
      out,
      "{\"time\":\"2024-05-01 10:00:00.000\",\"level\":\"INFO\",\"class\":\"app::auth\",\"method\":\"login\",\"line\":\"12\",\"message\":\"hello\"}\n"
    );
  }

  #[test]
  fn test_json_fields_parse_back() {
    let out = EventFormat::Json.format_fields(&meta(), &fields());
    let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
    assert_eq!(value["user"], "bob");
    assert_eq!(value["action"], "login");
    assert_eq!(value["level"], "INFO");
    assert!(value.get("message").is_none());
  }

  #[test]
  fn test_every_form_is_newline_terminated() {
    let payloads = [
      LogPayload::Message("m".to_string()),
      LogPayload::Fields(fields()),
      LogPayload::Fields(vec![]),
    ];
    for format in [
      EventFormat::Default,
      EventFormat::Kv,
      EventFormat::Csv,
      EventFormat::Xml,
      EventFormat::Json,
    ] {
      for payload in &payloads {
        let out = format.format(&meta(), payload);
        assert!(out.ends_with('\n'), "{} did not terminate", format.as_str());
      }
    }
  }

  #[test]
  fn test_format_deserializes_lowercase() {
    let format: EventFormat = serde_json::from_str("\"kv\"").unwrap();
    assert_eq!(format, EventFormat::Kv);
    assert_eq!(EventFormat::default(), EventFormat::Default);
  }
}
