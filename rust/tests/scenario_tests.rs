//! End-to-end scenarios through the JSON project envelope.

use chrono::NaiveDate;
use critpath_rust::{
    analyze_project, AnalysisConfig, Diagnostic, MalformedInput, Project, RiskLevel, TaskId,
};
use serde_json::json;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_fan_out_scenario() {
    let project = Project::from_value(&json!({
        "project_name": "Fan out",
        "start_date": "2025-03-03",
        "tasks": [
            {"id": "A", "duration": 5, "resources": ["r1"]},
            {"id": "B", "duration": 3, "predecessors": ["A"], "resources": ["r2"]},
            {"id": "C", "duration": 4, "predecessors": ["A"], "resources": ["r3"]}
        ]
    }))
    .unwrap();
    let analysis = analyze_project(&project, date(2000, 1, 1), &AnalysisConfig::default());

    let offsets: Vec<_> = analysis
        .schedule
        .entries
        .iter()
        .map(|e| (e.id.to_string(), e.start_offset, e.end_offset))
        .collect();
    assert_eq!(
        offsets,
        vec![
            ("A".to_string(), 0, 5),
            ("B".to_string(), 5, 8),
            ("C".to_string(), 5, 9)
        ]
    );
    assert_eq!(analysis.schedule.end_date(), date(2025, 3, 12));
    assert_eq!(
        analysis.critical_path.path_ids,
        vec![TaskId::from("A"), TaskId::from("C")]
    );
    assert_eq!(analysis.critical_path.total_duration, 9);
    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn test_french_record_with_anomalies() {
    let payload = r#"{
        "nom_projet": "Migration",
        "date_debut": "2025-09-01",
        "responsable": "Camille",
        "taches": [
            {"id": 1, "nom": "Audit", "duree_estimee": 2, "ressources_requises": ["Alice"],
             "statut": "Terminée"},
            {"id": 2, "nom": "Export", "duree_estimee": 0, "predecesseurs": [1, 99],
             "ressources_requises": ["Alice"]},
            {"id": 3, "nom": "Import", "duree_estimee": 4.5, "predecesseurs": [2]},
            {"id": 3, "nom": "Import v2", "duree_estimee": 6, "predecesseurs": [2],
             "ressources_requises": ["Bob"]}
        ]
    }"#;
    let project = Project::from_json_str(payload).unwrap();
    let analysis = analyze_project(&project, date(2000, 1, 1), &AnalysisConfig::default());

    assert_eq!(analysis.summary.project_name, "Migration");
    assert_eq!(analysis.summary.manager.as_deref(), Some("Camille"));
    assert_eq!(analysis.summary.task_count, 3);
    assert_eq!(analysis.summary.completion_percentage, 33.3);

    let import = analysis.schedule.entry(&TaskId::Num(3)).unwrap();
    assert_eq!(import.name, "Import v2");
    assert_eq!((import.start_offset, import.end_offset), (3, 9));
    assert_eq!(analysis.critical_path.total_duration, 9);

    assert_eq!(
        analysis.diagnostics,
        vec![
            Diagnostic::DefaultedDuration {
                task: TaskId::Num(2),
                raw: Some(0.0)
            },
            Diagnostic::DuplicateId { task: TaskId::Num(3) },
            Diagnostic::DanglingReference {
                task: TaskId::Num(2),
                missing: TaskId::Num(99)
            },
        ]
    );
    // Mean 3, threshold 4.5: task 3 is a critical bottleneck.
    assert_eq!(analysis.risks.risks.bottlenecks.len(), 1);
    assert_eq!(analysis.risks.risk_level, RiskLevel::Low);
}

#[test]
fn test_malformed_payloads() {
    assert!(matches!(
        Project::from_json_str(r#"{"tasks": "none"}"#),
        Err(MalformedInput::NotASequence("a string"))
    ));
    assert!(matches!(
        Project::from_json_str(r#"{"tasks": [{"name": "no id"}]}"#),
        Err(MalformedInput::MissingId { index: 0 })
    ));
}

#[test]
fn test_synonyms_and_resource_records_scenario() {
    let project = Project::from_value(&json!({
        "nom_projet": "Mixed keys",
        "project_name": "ignored",
        "date_debut": "2025-06-02",
        "taches": [
            {"id": 1, "nom": "Design", "name": "ignored", "duree": 4, "duration": 40,
             "ressources_requises": [{"name": "Alice", "role": "lead"}], "statut": 1},
            {"id": 2, "name": "Build", "duration": 2, "predecessors": [1],
             "dependencies": [99], "resources": ["Alice"]},
            {"id": 3, "name": "Docs", "duration": 1, "resources": [{"name": "Alice"}]}
        ]
    }))
    .unwrap();
    assert_eq!(project.name, "Mixed keys");

    let config = AnalysisConfig {
        extended_rules: true,
        ..AnalysisConfig::default()
    };
    let analysis = analyze_project(&project, date(2000, 1, 1), &config);

    assert_eq!(analysis.schedule.entries[1].start_date, date(2025, 6, 6));
    assert_eq!(analysis.critical_path.total_duration, 6);
    assert!(!analysis
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::DanglingReference { .. })));

    let conflicts = analysis.risks.risks.resource_conflicts.unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].resource, "Alice");
    let grouped: Vec<_> = conflicts[0].conflicting_tasks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(grouped, vec![TaskId::Num(1), TaskId::Num(3)]);
    assert_eq!(conflicts[0].critical_tasks, 1);
    assert_eq!(analysis.risks.risk_scores.unwrap().resource_conflicts, 20);
}
