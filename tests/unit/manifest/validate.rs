use super::*;

fn def(json: &str) -> ManifestDef {
    serde_json::from_str(json).unwrap()
}

#[test]
fn minimal_manifest_is_valid() {
    assert!(validate_manifest(&def(r#"{ "version": "1" }"#)).is_ok());
}

#[test]
fn issues_are_collected_with_paths() {
    let d = def(
        r#"{
            "version": "2",
            "page_class": " ",
            "triggers": [
                { "target": ".ok" },
                { "target": "" },
                { "target": ".word", "mode": "group" },
                { "target": ".card", "duration": -1 }
            ],
            "header": { "show_before": 300, "hide_after": 200 },
            "spy": { "band": 80 },
            "modals": [ { "dialog": "" } ]
        }"#,
    );
    let err = validate_manifest(&d).unwrap_err();
    let lines: Vec<String> = err.issues.iter().map(ToString::to_string).collect();
    assert_eq!(lines.len(), 8, "{lines:#?}");
    assert!(lines[0].starts_with("$.version: "));
    assert!(lines[1].starts_with("$.page_class: "));
    assert!(lines[2].starts_with("$.triggers[1].target: "));
    assert!(lines[3].starts_with("$.triggers[2]: "));
    assert!(lines[4].starts_with("$.triggers[3]: "));
    assert!(lines[5].starts_with("$.header: "));
    assert!(lines[6].starts_with("$.spy: "));
    assert!(lines[7].starts_with("$.modals[0].dialog: "));
    assert_eq!(err.to_string().lines().count(), 8);
}
