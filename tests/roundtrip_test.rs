//! Annotation output properties: well-formedness, preservation, and
//! idempotency of a second run over the engine's own output.

use std::fs;
use stereomap::archive::{run_engine, AnalysisContext};
use stereomap::cli::{Cli, Commands, ReportFormat};
use stereomap::xpath::{compile, document_root, element_text, evaluate_elements};
use sxd_document::parser;

const ARCHIVE: &str = r#"<unit xmlns="http://www.srcML.org/srcML/src" revision="1.0.0"><unit language="C++"><class>class <name>Point</name> <block>{<public>public:
<decl_stmt><decl><type><name>int</name></type> <name>x</name></decl>;</decl_stmt>
<function><type><name>int</name></type> <name>getX</name><parameter_list>()</parameter_list> <specifier>const</specifier> <block>{<block_content> <return>return <expr><name>x</name></expr>;</return> </block_content>}</block></function>
<function><type><name>void</name></type> <name>setX</name><parameter_list>(<parameter><decl><type><name>int</name></type> <name>v</name></decl></parameter>)</parameter_list> <block>{<block_content> <expr_stmt><expr><name>x</name> <operator>=</operator> <name>v</name></expr>;</expr_stmt> </block_content>}</block></function>
</public>}</block>;</class></unit><unit language="Java"><class>class <name>Maker</name> <block>{
<function><type><specifier>public</specifier> <name>Maker</name></type> <name>spawn</name><parameter_list>()</parameter_list> <block>{<block_content> <return>return <expr><operator>new</operator> <call><name>Maker</name><argument_list>()</argument_list></call></expr>;</return> </block_content>}</block></function>
}</block></class></unit></unit>"#;

#[test]
fn annotated_output_is_well_formed_and_carries_labels() {
    let run = run_engine(ARCHIVE, &AnalysisContext::default(), true).unwrap();
    let annotated = run.annotated_xml.expect("annotation requested");

    let package = parser::parse(&annotated).expect("annotated output parses");
    let doc = package.as_document();
    let root = document_root(&doc).unwrap();

    let classes = evaluate_elements(&compile(".//src:class").unwrap(), root);
    assert_eq!(classes.len(), 2);
    assert_eq!(
        classes[0].attribute_value("stereotype"),
        Some("data-class small-class")
    );

    let functions = evaluate_elements(&compile(".//src:function").unwrap(), root);
    assert_eq!(functions.len(), 3);
    assert_eq!(functions[0].attribute_value("stereotype"), Some("get"));
    assert_eq!(functions[1].attribute_value("stereotype"), Some("set"));
    let maker_labels = functions[2].attribute_value("stereotype").unwrap();
    assert!(maker_labels.contains("factory"));
}

#[test]
fn source_text_survives_annotation() {
    let run = run_engine(ARCHIVE, &AnalysisContext::default(), true).unwrap();
    let annotated = run.annotated_xml.unwrap();

    let before = parser::parse(ARCHIVE).unwrap();
    let after = parser::parse(&annotated).unwrap();
    let before_doc = before.as_document();
    let after_doc = after.as_document();
    let before_text = element_text(document_root(&before_doc).unwrap());
    let after_text = element_text(document_root(&after_doc).unwrap());
    assert_eq!(before_text, after_text);
}

#[test]
fn reannotating_the_output_is_idempotent() {
    let ctx = AnalysisContext::default();
    let first = run_engine(ARCHIVE, &ctx, true).unwrap();
    let annotated = first.annotated_xml.clone().unwrap();

    let second = run_engine(&annotated, &ctx, true).unwrap();
    assert_eq!(first.classes.len(), second.classes.len());
    for (a, b) in first.classes.iter().zip(second.classes.iter()) {
        assert_eq!(a.names.bare, b.names.bare);
        assert_eq!(a.stereotypes, b.stereotypes);
        assert_eq!(a.methods.len(), b.methods.len());
        for (ma, mb) in a.methods.iter().zip(b.methods.iter()) {
            assert_eq!(ma.stereotypes, mb.stereotypes);
            assert_eq!(ma.xpath, mb.xpath);
        }
    }
}

#[test]
fn annotate_command_writes_archive_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("archive.xml");
    let output = dir.path().join("annotated.xml");
    let report = dir.path().join("report.json");
    fs::write(&input, ARCHIVE).unwrap();

    let cli = Cli {
        command: Commands::Annotate {
            input: input.clone(),
            output: output.clone(),
            primitives: None,
            taxonomy: None,
            methods_per_class_threshold: None,
            report: Some(ReportFormat::Json),
            report_output: Some(report.clone()),
            config: None,
        },
    };
    stereomap::commands::run(cli).unwrap();

    let annotated = fs::read_to_string(&output).unwrap();
    assert!(annotated.contains("stereotype"));
    parser::parse(&annotated).expect("output parses");

    let report_text = fs::read_to_string(&report).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report_text).unwrap();
    assert_eq!(json["classes"].as_array().unwrap().len(), 2);
    assert!(json["method_label_totals"]["get"].as_u64().unwrap() >= 1);
}

#[test]
fn threshold_is_honoured_end_to_end() {
    // A balanced class over the default threshold flips large-class on
    // and off with the configured limit.
    let mut members = String::new();
    for i in 0..6 {
        members.push_str(&format!(
            "<decl_stmt><decl><type><name>int</name></type> <name>f{i}</name></decl>;</decl_stmt>\n"
        ));
    }
    for i in 0..6 {
        members.push_str(&format!(
            "<function><type><name>int</name></type> <name>get_f{i}</name>\
             <parameter_list>()</parameter_list> <specifier>const</specifier> \
             <block>{{<block_content> <return>return <expr><name>f{i}</name></expr>;\
             </return> </block_content>}}</block></function>\n"
        ));
        members.push_str(&format!(
            "<function><type><name>void</name></type> <name>set_f{i}</name>\
             <parameter_list>(<parameter><decl><type><name>int</name></type> \
             <name>v</name></decl></parameter>)</parameter_list> \
             <block>{{<block_content> <expr_stmt><expr><name>f{i}</name> \
             <operator>=</operator> <name>v</name></expr>;</expr_stmt> \
             </block_content>}}</block></function>\n"
        ));
    }
    // 6 controllers: drive a local of external non-primitive type.
    for i in 0..6 {
        members.push_str(&format!(
            "<function><type><name>void</name></type> <name>drive{i}</name>\
             <parameter_list>(<parameter><decl><type><name>Engine</name>\
             <modifier>&amp;</modifier></type> <name>e</name></decl></parameter>)\
             </parameter_list> <block>{{<block_content> <expr_stmt><expr><call><name>\
             <name>e</name><operator>.</operator><name>start</name></name>\
             <argument_list>()</argument_list></call></expr>;</expr_stmt> \
             </block_content>}}</block></function>\n"
        ));
    }
    // 6 factories.
    for i in 0..6 {
        members.push_str(&format!(
            "<function><type><name>Widget</name></type> <name>make{i}</name>\
             <parameter_list>()</parameter_list> \
             <block>{{<block_content> <return>return <expr><operator>new</operator> \
             <call><name>Widget</name><argument_list>()</argument_list></call></expr>;\
             </return> </block_content>}}</block></function>\n"
        ));
    }
    let body =
        format!("<class>class <name>Big</name> <block>{{<public>public:\n{members}</public>}}</block>;</class>");
    let xml = format!(
        r#"<unit xmlns="http://www.srcML.org/srcML/src" language="C++">{body}</unit>"#
    );

    let default_ctx = AnalysisContext::default();
    let run = run_engine(&xml, &default_ctx, false).unwrap();
    let labels: Vec<&str> = run.classes[0]
        .stereotypes
        .iter()
        .map(|s| s.as_str())
        .collect();
    assert!(labels.contains(&"large-class"), "labels were {labels:?}");

    let strict_ctx = AnalysisContext {
        methods_per_class_threshold: 40,
        ..AnalysisContext::default()
    };
    let strict = run_engine(&xml, &strict_ctx, false).unwrap();
    assert!(!strict.classes[0]
        .stereotypes
        .iter()
        .any(|s| s.as_str() == "large-class"));
}
