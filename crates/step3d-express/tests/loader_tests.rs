//! Loader tests against files on disk.

use std::io::Write;
use std::time::{Duration, Instant};

use proptest::prelude::*;
use step3d_express::*;
use tempfile::NamedTempFile;

fn exchange(data: &str) -> String {
    format!(
        "ISO-10303-21;\nHEADER;\n\
         FILE_DESCRIPTION(('FreeCAD Model'),'2;1');\n\
         FILE_NAME('MyParts.step','2020-09-01T18:50:05',('Author'),(''),\
         'Open CASCADE STEP processor 7.2','FreeCAD','Unknown');\n\
         FILE_SCHEMA(('AUTOMOTIVE_DESIGN {{ 1 0 10303 214 1 1 1 1 }}'));\n\
         ENDSEC;\nDATA;\n{data}\nENDSEC;\nEND-ISO-10303-21;\n"
    )
}

#[test]
fn test_load_file_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    let text = exchange(
        "#10=PRODUCT('Part','Part','',(#11));\n\
         #11=PRODUCT_CONTEXT('',#12,'mechanical');\n\
         #12=APPLICATION_CONTEXT('core data for automotive mechanical design processes');",
    );
    file.write_all(text.as_bytes()).unwrap();

    let (pool, report) = load_file(file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(report.severity, Severity::Null);
    assert_eq!(pool.len(), 3);

    let product = pool.get(10).unwrap();
    assert_eq!(product.raw_attribute("name").unwrap(), "'Part'");

    let header = pool.header_instances();
    assert_eq!(header.len(), 3);
    assert_eq!(header[1].raw_attribute("author").unwrap(), "('Author')");
    assert_eq!(header[1].raw_attribute("organization").unwrap(), "('')");
}

#[test]
fn test_latin1_file_keeps_every_byte() {
    let mut file = NamedTempFile::new().unwrap();
    let text = exchange("#10=PRODUCT('Pi\u{e8}ce','Caf\u{e9}','',(#11));\n#11=PRODUCT_CONTEXT('',$,'mechanical');");
    let latin1: Vec<u8> = text.chars().map(|c| u8::try_from(u32::from(c)).unwrap()).collect();
    file.write_all(&latin1).unwrap();

    let (pool, report) = load_file(file.path(), &LoadOptions::default()).unwrap();
    assert_eq!(report.severity, Severity::Null);
    let product = pool.get(10).unwrap();
    assert_eq!(product.attribute("id").unwrap().as_str(), Some("Pi\u{e8}ce"));
    assert_eq!(product.attribute("name").unwrap().as_str(), Some("Caf\u{e9}"));
}

#[test]
fn test_utf8_file_is_read_as_utf8() {
    let mut file = NamedTempFile::new().unwrap();
    let text = exchange("#10=PRODUCT('Pi\u{e8}ce','Caf\u{e9}','',(#11));\n#11=PRODUCT_CONTEXT('',$,'mechanical');");
    file.write_all(text.as_bytes()).unwrap();

    let (pool, _) = load_file(file.path(), &LoadOptions::default()).unwrap();
    let product = pool.get(10).unwrap();
    assert_eq!(product.attribute("name").unwrap().as_str(), Some("Caf\u{e9}"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_file(&dir.path().join("absent.step"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_checks_can_be_disabled() {
    let text = exchange("#1=DIRECTION((0.,0.,1.));\n#2=AXIS2_PLACEMENT_3D('',#77,$,$);");
    let options = LoadOptions {
        check_arity: false,
        check_references: false,
    };
    let (pool, report) = load_str(&text, &options);
    assert_eq!(report.severity, Severity::Null);
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_multiple_data_sections_are_merged() {
    let text = "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('AP242'));\nENDSEC;\n\
                DATA;\n#1=DIRECTION('',(1.,0.,0.));\nENDSEC;\n\
                DATA('second',('AP242'));\n#2=DIRECTION('',(0.,1.,0.));\nENDSEC;\n\
                END-ISO-10303-21;\n";
    let (pool, report) = load_str(text, &LoadOptions::default());
    assert_eq!(report.severity, Severity::Null);
    let ids: Vec<_> = pool.instances().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

fn points(n: usize) -> String {
    exchange(
        &(1..=n)
            .map(|i| format!("#{i}=CARTESIAN_POINT('',({i}.,0.,0.));\n"))
            .collect::<String>(),
    )
}

#[test]
fn test_instance_lines_in_large_file() {
    let n = 20_000;
    let file = parser::parse_exchange(&points(n)).unwrap();
    assert_eq!(file.data.len(), n);
    // Header occupies lines 1..=6, DATA; is line 7.
    assert_eq!(file.data[0].line, 8);
    assert_eq!(file.data[n - 1].line, 7 + n);
}

#[test]
fn test_load_time_grows_linearly() {
    let small = points(5_000);
    let large = points(40_000);

    let time = |text: &str| {
        let start = Instant::now();
        let (pool, report) = load_str(text, &LoadOptions::default());
        assert_eq!(report.severity, Severity::Null);
        assert!(!pool.is_empty());
        start.elapsed()
    };
    time(&small);
    let t_small = time(&small).max(Duration::from_millis(1));
    let t_large = time(&large);

    // 8x the input; a quadratic reader would take about 64x as long.
    assert!(
        t_large < t_small * 24,
        "small={t_small:?} large={t_large:?}"
    );
}

proptest! {
    #[test]
    fn string_literals_survive_verbatim(content in "[A-Za-z0-9 _:;,.=>\\[\\]-]{0,24}") {
        let text = exchange(&format!("#1=PRODUCT('p','{content}','',());"));
        let (pool, report) = load_str(&text, &LoadOptions::default());
        prop_assert_eq!(report.severity, Severity::Null);
        let name = pool.get(1).unwrap().attribute("name").unwrap();
        prop_assert_eq!(name.as_str(), Some(content.as_str()));
    }

    #[test]
    fn file_order_is_pool_order(ids in proptest::collection::hash_set(1u64..10_000, 1..40)) {
        let ids: Vec<u64> = ids.into_iter().collect();
        let data: String = ids
            .iter()
            .map(|id| format!("#{id}=DIRECTION('',(0.,0.,1.));\n"))
            .collect();
        let (pool, _) = load_str(&exchange(&data), &LoadOptions::default());
        let loaded: Vec<u64> = pool.instances().map(|i| i.id).collect();
        prop_assert_eq!(loaded, ids);
    }
}
