use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use scrub_config::Config;
use scrub_core::{ComponentArgs, Document, DocumentStream, Error, Reader, Result, Writer, keys};
use scrub_engine::{Pipeline, PipelineRequest, Registries};
use scrub_security::{AnalyzeRequest, DetectedEntity, EntityAnalyzer, Redactor, RedactorSettings};
use tempfile::TempDir;

/// Reports every occurrence of a fixed set of literals
struct LiteralAnalyzer {
    literals: Vec<(&'static str, &'static str)>,
    calls: Mutex<usize>,
}

impl LiteralAnalyzer {
    fn new(literals: Vec<(&'static str, &'static str)>) -> Arc<Self> {
        Arc::new(Self {
            literals,
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl EntityAnalyzer for LiteralAnalyzer {
    fn analyze(&self, text: &str, _request: &AnalyzeRequest<'_>) -> Result<Vec<DetectedEntity>> {
        *self.calls.lock().unwrap() += 1;
        let mut found = Vec::new();
        for (entity_type, literal) in &self.literals {
            for (start, matched) in text.match_indices(literal) {
                found.push(DetectedEntity::new(*entity_type, start, start + matched.len(), 0.9));
            }
        }
        Ok(found)
    }

    fn supported_entities(&self) -> Vec<String> {
        self.literals.iter().map(|(t, _)| t.to_string()).collect()
    }
}

fn contacts() -> Arc<LiteralAnalyzer> {
    LiteralAnalyzer::new(vec![
        ("PERSON", "John Doe"),
        ("PERSON", "Jane Roe"),
        ("EMAIL_ADDRESS", "john@example.com"),
        ("EMAIL_ADDRESS", "jane@example.com"),
    ])
}

fn config() -> Config {
    Config {
        hmac_secret: "pipeline-test-secret".to_string(),
        ..Config::default()
    }
}

fn pipeline_with(config: Config, registries: Registries, analyzer: Arc<dyn EntityAnalyzer>) -> Pipeline {
    let settings = RedactorSettings::from_config(&config).unwrap();
    let redactor = Redactor::new(analyzer, settings);
    Pipeline::new(Arc::new(config), Arc::new(registries), Arc::new(redactor))
}

fn pipeline(config: Config, analyzer: Arc<dyn EntityAnalyzer>) -> Pipeline {
    pipeline_with(config, Registries::with_defaults().unwrap(), analyzer)
}

fn write_input(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_hash_redaction_of_prose() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "note.txt", "Contact John Doe at john@example.com");
    let output = dir.path().join("out.txt");

    let pipeline = pipeline(config(), contacts());
    let request = PipelineRequest::new(&input, "text_file", "text_file").with_output(&output);
    let docs = pipeline.process(&request).unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].redacted_entities(), Some(2));
    assert_eq!(docs[0].redaction_strategy(), Some("hash"));
    assert_eq!(docs[0].get_str(keys::FILENAME), Some("note.txt"));

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(Some(written.as_str()), docs[0].content.as_deref());
    assert!(!written.contains("John Doe"));
    assert!(!written.contains("john@example.com"));

    let person = written.find("<PERSON:").unwrap();
    let email = written.find("<EMAIL_ADDRESS:").unwrap();
    assert!(person < email);
    assert_eq!(written.matches('<').count(), 2);
}

#[test]
fn test_consecutive_markers_are_merged() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "note.txt", "[REDACTED] [REDACTED] text");
    let output = dir.path().join("out.txt");

    let pipeline = pipeline(config(), LiteralAnalyzer::new(Vec::new()));
    let request = PipelineRequest::new(&input, "text_file", "text_file")
        .with_output(&output)
        .with_postprocessors(&["redaction_cleaner"]);
    pipeline.process(&request).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "[REDACTED] text");
}

#[test]
fn test_structured_rows_share_tokens_for_equal_values() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        dir.path(),
        "patients.csv",
        "ID,Name,Email\n1,John Doe,john@example.com\n2,Jane Roe,jane@example.com\n3,John Doe,john@example.com\n",
    );
    let output = dir.path().join("redacted.csv");

    let mut config = config();
    config.preprocessors.insert(
        "field_selector".to_string(),
        serde_json::json!({ "fields": ["Email"] }),
    );

    let analyzer = contacts();
    let pipeline = pipeline(config, analyzer.clone());
    let request = PipelineRequest::new(&input, "csv_file", "csv_file")
        .with_output(&output)
        .with_preprocessors(&["field_selector"])
        .with_postprocessors(&["dict_merger"]);
    let docs = pipeline.process(&request).unwrap();

    assert_eq!(docs.len(), 3);
    // one analyzer call per selected field
    assert_eq!(analyzer.calls(), 3);

    let emails: Vec<String> = docs
        .iter()
        .map(|doc| doc.fields(keys::REDACTED_DATA).unwrap()["Email"].clone())
        .collect();
    assert!(emails[0].starts_with("<EMAIL_ADDRESS:"));
    assert_eq!(emails[0], emails[2]);
    assert_ne!(emails[0], emails[1]);

    for doc in &docs {
        assert_eq!(doc.content, None);
        assert_eq!(doc.redacted_entities(), Some(1));
        assert_eq!(doc.redaction_strategy(), Some("hash"));
    }

    // unselected fields are carried through untouched
    let row = docs[1].fields(keys::REDACTED_DATA).unwrap();
    assert_eq!(row["ID"], "2");
    assert_eq!(row["Name"], "Jane Roe");

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "ID,Name,Email");
    assert_eq!(lines[1], format!("1,John Doe,{}", emails[0]));
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_blank_fields_skip_the_analyzer() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "rows.csv", "Name,Email\nJohn Doe,\n");

    let analyzer = contacts();
    let pipeline = pipeline(config(), analyzer.clone());
    let request = PipelineRequest::new(&input, "csv_file", "stdout")
        .with_preprocessors(&["field_selector"])
        .with_postprocessors(&["dict_merger"])
        .with_strategy("replace");
    let docs = pipeline.process(&request).unwrap();

    assert_eq!(analyzer.calls(), 1);
    let row = docs[0].fields(keys::REDACTED_DATA).unwrap();
    assert_eq!(row["Name"], "[REDACTED]");
    assert_eq!(row["Email"], "");
    assert_eq!(docs[0].redaction_strategy(), Some("replace"));
}

#[test]
fn test_empty_content_yields_zero_entities() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "empty.txt", "");
    let output = dir.path().join("out.txt");

    let analyzer = contacts();
    let pipeline = pipeline(config(), analyzer.clone());
    let request = PipelineRequest::new(&input, "text_file", "text_file").with_output(&output);
    let docs = pipeline.process(&request).unwrap();

    assert_eq!(docs[0].content.as_deref(), Some(""));
    assert_eq!(docs[0].redacted_entities(), Some(0));
    assert_eq!(analyzer.calls(), 0);
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn test_unknown_components_list_available_names() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "note.txt", "hello");
    let pipeline = pipeline(config(), contacts());

    let err = pipeline
        .process(&PipelineRequest::new(&input, "pdf_file", "stdout"))
        .unwrap_err();
    assert!(matches!(err, Error::Registration(_)));
    assert_eq!(
        err.to_string(),
        "reader 'pdf_file' not found. Available: csv_file, text_file, xlsx_file"
    );

    let err = pipeline
        .process(&PipelineRequest::new(&input, "text_file", "stdout").with_postprocessors(&["spellcheck"]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "postprocessor 'spellcheck' not found. Available: dict_merger, format_preserver, redaction_cleaner"
    );
}

#[test]
fn test_stage_errors_surface_unchanged() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "rows.csv", "Name\nJohn Doe\n");
    let pipeline = pipeline(config(), contacts());

    // rows without field selection have no content to redact
    let err = pipeline
        .process(&PipelineRequest::new(&input, "csv_file", "stdout"))
        .unwrap_err();
    assert!(matches!(err, Error::Redactor(_)));
    assert_eq!(err.to_string(), "Redactor error: Document must contain content");

    let err = pipeline
        .process(&PipelineRequest::new(dir.path().join("missing.txt"), "text_file", "stdout"))
        .unwrap_err();
    assert!(matches!(err, Error::Reader(_)));
}

#[test]
fn test_unknown_strategy_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "note.txt", "Contact John Doe");
    let output = dir.path().join("out.txt");

    let pipeline = pipeline(config(), contacts());
    let request = PipelineRequest::new(&input, "text_file", "text_file")
        .with_output(&output)
        .with_strategy("shred");

    let err = pipeline.process(&request).unwrap_err();
    assert_eq!(err.to_string(), "Redactor error: Unknown redaction strategy: shred");
    assert!(!output.exists());
}

#[test]
fn test_failure_keeps_earlier_output() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("notes");
    fs::create_dir(&inputs).unwrap();
    write_input(&inputs, "a.txt", "first note");
    write_input(&inputs, "b.txt", "second note");
    let output = dir.path().join("out.txt");

    // b.txt loses its content, which whitespace_normalizer rejects
    let mut registries = Registries::with_defaults().unwrap();
    registries
        .preprocessors
        .register("drop_second", |_: &ComponentArgs| {
            Ok(Box::new(DropContent("second")) as Box<dyn scrub_core::Preprocessor>)
        })
        .unwrap();

    let pipeline = pipeline_with(config(), registries, contacts());
    let request = PipelineRequest::new(&inputs, "text_file", "text_file")
        .with_output(&output)
        .with_preprocessors(&["drop_second", "whitespace_normalizer"]);

    let err = pipeline.process(&request).unwrap_err();
    assert!(matches!(err, Error::Preprocessor(_)));
    assert_eq!(fs::read_to_string(&output).unwrap(), "first note");
}

struct DropContent(&'static str);

impl scrub_core::Preprocessor for DropContent {
    fn process(&self, document: Document) -> Result<Document> {
        if document.content.as_deref().is_some_and(|c| c.starts_with(self.0)) {
            return Ok(document.with_content(None));
        }
        Ok(document)
    }
}

#[derive(Default)]
struct Recorded {
    written: Vec<Document>,
    finalized: usize,
}

struct RecordingWriter(Arc<Mutex<Recorded>>);

impl Writer for RecordingWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        self.0.lock().unwrap().written.push(document.clone());
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.0.lock().unwrap().finalized += 1;
        Ok(())
    }
}

#[test]
fn test_writer_is_finalized_once_per_run() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("notes");
    fs::create_dir(&inputs).unwrap();
    write_input(&inputs, "a.txt", "John Doe");
    write_input(&inputs, "b.txt", "jane@example.com");
    write_input(&inputs, "c.txt", "nothing here");

    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let mut registries = Registries::with_defaults().unwrap();
    let sink = recorded.clone();
    registries
        .writers
        .register("recording", move |_: &ComponentArgs| {
            Ok(Box::new(RecordingWriter(sink.clone())) as Box<dyn Writer>)
        })
        .unwrap();

    let pipeline = pipeline_with(config(), registries, contacts());
    let docs = pipeline
        .process(&PipelineRequest::new(&inputs, "text_file", "recording").with_strategy("replace"))
        .unwrap();

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.finalized, 1);
    assert_eq!(recorded.written, docs);

    let contents: Vec<_> = docs.iter().map(|d| d.content.as_deref().unwrap()).collect();
    assert_eq!(contents, vec!["[REDACTED]", "[REDACTED]", "nothing here"]);
}

#[test]
fn test_bundled_analyzer_end_to_end() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        dir.path(),
        "visits.csv",
        "ID,Contact,Notes\n7,mary@clinic.org,SSN 123-45-6789 on file\n",
    );
    let output = dir.path().join("visits.out.csv");

    let pipeline = Pipeline::from_config(config()).unwrap();
    let request = PipelineRequest::new(&input, "csv_file", "csv_file")
        .with_output(&output)
        .with_preprocessors(&["field_selector"])
        .with_postprocessors(&["dict_merger"])
        .with_strategy("replace");
    let docs = pipeline.process(&request).unwrap();

    assert_eq!(docs[0].redacted_entities(), Some(2));
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "ID,Contact,Notes\n7,[REDACTED],SSN [REDACTED] on file\n"
    );
}

#[test]
fn test_rows_without_matching_fields_are_kept() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        dir.path(),
        "patients.csv",
        "ID,Name\n1,John Doe\n2,Jane Roe\n",
    );
    let output = dir.path().join("redacted.csv");

    let mut config = config();
    config.preprocessors.insert(
        "field_selector".to_string(),
        serde_json::json!({ "fields": ["Phone"] }),
    );

    let analyzer = contacts();
    let pipeline = pipeline(config, analyzer.clone());
    let request = PipelineRequest::new(&input, "csv_file", "csv_file")
        .with_output(&output)
        .with_preprocessors(&["field_selector"])
        .with_postprocessors(&["dict_merger"]);
    let docs = pipeline.process(&request).unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(analyzer.calls(), 0);
    for doc in &docs {
        assert_eq!(doc.redacted_entities(), Some(0));
        assert_eq!(doc.fields(keys::REDACTED_DATA), doc.fields(keys::ORIGINAL_DATA));
    }

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "ID,Name\n1,John Doe\n2,Jane Roe\n"
    );
}

#[test]
fn test_malformed_format_preserver_table_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "note.txt", "Contact John Doe");
    let output = dir.path().join("out.txt");

    let mut config = config();
    config.postprocessors.insert(
        "format_preserver".to_string(),
        serde_json::json!({ "preserve_paragraphs": "yes" }),
    );

    let pipeline = pipeline(config, contacts());
    let request = PipelineRequest::new(&input, "text_file", "text_file")
        .with_output(&output)
        .with_postprocessors(&["format_preserver"]);

    let err = pipeline.process(&request).unwrap_err();
    assert!(matches!(
        err,
        Error::Instantiation { ref name, .. } if name == "format_preserver"
    ));
    assert!(!output.exists());
}

type Events = Arc<Mutex<Vec<String>>>;

/// Yields `doc0..docN`, logging each pull
struct CountingReader {
    count: usize,
    events: Events,
}

impl Reader for CountingReader {
    fn documents(&self) -> Result<DocumentStream<'_>> {
        let events = self.events.clone();
        Ok(Box::new((0..self.count).map(move |i| {
            events.lock().unwrap().push(format!("read doc{i}"));
            Ok(Document::text(format!("doc{i}")))
        })))
    }
}

struct EventWriter(Events);

impl Writer for EventWriter {
    fn write(&mut self, document: &Document) -> Result<()> {
        let content = document.content.as_deref().unwrap_or_default();
        self.0.lock().unwrap().push(format!("write {content}"));
        Ok(())
    }
}

#[test]
fn test_each_document_is_written_before_the_next_is_read() {
    let events: Events = Arc::default();
    let mut registries = Registries::with_defaults().unwrap();

    let source = events.clone();
    registries
        .readers
        .register("counting", move |_: &ComponentArgs| {
            Ok(Box::new(CountingReader {
                count: 3,
                events: source.clone(),
            }) as Box<dyn Reader>)
        })
        .unwrap();
    let sink = events.clone();
    registries
        .writers
        .register("events", move |_: &ComponentArgs| {
            Ok(Box::new(EventWriter(sink.clone())) as Box<dyn Writer>)
        })
        .unwrap();

    let pipeline = pipeline_with(config(), registries, contacts());
    let docs = pipeline
        .process(&PipelineRequest::new("unused", "counting", "events"))
        .unwrap();

    assert_eq!(docs.len(), 3);
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            "read doc0",
            "write doc0",
            "read doc1",
            "write doc1",
            "read doc2",
            "write doc2",
        ]
    );
}
