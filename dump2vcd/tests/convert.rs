// End-to-end conversion tests: dump file + layout file -> VCD text
use dump2vcd::{ConvertConfig, ConvertError, Converter, HexDumpParser};
use std::fs;
use std::path::Path;

const WORDS_PER_LINE: usize = 8;

/// Render words in the analyzer's `addr:\tword\tword...` layout
fn dump_text(words: &[u32]) -> String {
    let mut text = String::new();
    for (line_idx, chunk) in words.chunks(WORDS_PER_LINE).enumerate() {
        let addr = line_idx * WORDS_PER_LINE * 4;
        let data: Vec<String> = chunk.iter().map(|w| format!("{:08x}", w)).collect();
        text.push_str(&format!("{:08x}:\t{}\n", addr, data.join("\t")));
    }
    text
}

fn convert_files(dump: &Path, layout: &Path) -> Result<Vec<String>, ConvertError> {
    let config = ConvertConfig::load(layout)?;
    let words = HexDumpParser::parse(dump)?;
    Converter::from_config(&config, words)?.render("DATE")
}

fn var_lines(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .filter(|l| l.starts_with("$var"))
        .map(String::as_str)
        .collect()
}

#[test]
fn test_placeholder_is_never_emitted() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("capture.dump");
    let layout = dir.path().join("layout.toml");

    // Two samples, one word group
    fs::write(&dump, dump_text(&[0xFFFF_FFFF, 0x0000_0000])).unwrap();
    fs::write(
        &layout,
        "[capture]\nsample_count = 2\n\n[signals]\nhead = 2\nempty = 5\ntail = 3\n",
    )
    .unwrap();

    let lines = convert_files(&dump, &layout).unwrap();

    assert_eq!(
        var_lines(&lines),
        vec![
            "$var wire 1 ! clk $end",
            "$var wire 2 \" head $end",
            "$var wire 3 # tail $end",
        ]
    );
    assert!(lines.iter().all(|l| !l.contains("empty")));

    // tail sits at offset 7, after the 5 placeholder bits
    let config = ConvertConfig::load(&layout).unwrap();
    let converter = Converter::from_config(&config, vec![0, 0]).unwrap();
    assert_eq!(converter.layout().signal("tail").unwrap().bit_offset, 7);

    // Each sample carries exactly two value lines
    let body_start = lines.iter().rposition(|l| l == "$end").unwrap() + 1;
    assert_eq!(
        &lines[body_start..],
        &["#0", "1!", "b11 \"", "b111 #", "#10", "0!", "#20", "1!", "b00 \"", "b000 #", "#30", "0!"]
    );
}

#[test]
fn test_full_capture_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("capture.dump");
    let layout = dir.path().join("layout.toml");

    let words: Vec<u32> = (0..1024u32).collect();
    fs::write(&dump, dump_text(&words)).unwrap();
    fs::write(&layout, "[signals]\ncount = 32\n").unwrap();

    let lines = convert_files(&dump, &layout).unwrap();
    let stamps: Vec<u64> = lines
        .iter()
        .filter_map(|l| l.strip_prefix('#'))
        .map(|t| t.parse().unwrap())
        .collect();

    assert_eq!(stamps.len(), 2048);
    for (i, pair) in stamps.chunks(2).enumerate() {
        assert_eq!(pair[0], i as u64 * 20);
        assert_eq!(pair[1], i as u64 * 20 + 10);
    }
    assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(stamps[2046], 20460);

    // Rising edges carry the counter value
    let last_value = lines.iter().rev().nth(2).unwrap();
    assert_eq!(last_value, &format!("b{:032b} \"", 1023));
}

#[test]
fn test_conversion_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("capture.dump");
    let layout = dir.path().join("layout.toml");

    let words: Vec<u32> = (0..64u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
    fs::write(&dump, dump_text(&words)).unwrap();
    fs::write(
        &layout,
        "[capture]\nsample_count = 16\n\n[signals]\na = 1\nb = 30\nc = 33\nempty = 2\nd = 60\n",
    )
    .unwrap();

    let config = ConvertConfig::load(&layout).unwrap();
    let run = || {
        let words = HexDumpParser::parse(&dump).unwrap();
        let mut out = Vec::new();
        Converter::from_config(&config, words)
            .unwrap()
            .write_trace(&mut out, &dump2vcd::vcd::header_date())
            .unwrap();
        String::from_utf8(out).unwrap()
    };

    let strip_date = |text: String| -> Vec<String> {
        text.lines()
            .enumerate()
            .filter(|(i, _)| *i != 1)
            .map(|(_, l)| l.to_string())
            .collect()
    };

    assert_eq!(strip_date(run()), strip_date(run()));
}

#[test]
fn test_default_layout_matches_fixed_format() {
    // trig0, data0, data1, data2 each occupy one full word group
    let sample_count = 1024;
    let words: Vec<u32> = (0..4 * sample_count as u32)
        .map(|i| (i / sample_count as u32) << 28 | (i % sample_count as u32))
        .collect();

    let config = ConvertConfig::default();
    let lines = Converter::from_config(&config, words)
        .unwrap()
        .render("DATE")
        .unwrap();

    assert_eq!(
        var_lines(&lines),
        vec![
            "$var wire 1 ! clk $end",
            "$var wire 32 \" trig0 $end",
            "$var wire 32 # data0 $end",
            "$var wire 32 $ data1 $end",
            "$var wire 32 % data2 $end",
        ]
    );

    let sample5 = lines.iter().position(|l| l == "#100").unwrap();
    assert_eq!(lines[sample5 + 1], "1!");
    assert_eq!(lines[sample5 + 2], format!("b{:032b} \"", 5u32));
    assert_eq!(lines[sample5 + 3], format!("b{:032b} #", 0x1000_0005u32));
    assert_eq!(lines[sample5 + 4], format!("b{:032b} $", 0x2000_0005u32));
    assert_eq!(lines[sample5 + 5], format!("b{:032b} %", 0x3000_0005u32));
    assert_eq!(lines[sample5 + 6], "#110");
}

#[test]
fn test_layout_needing_missing_word_group() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("capture.dump");
    let layout = dir.path().join("layout.toml");

    // One word group, but 30 + 4 bits straddle into a second one
    fs::write(&dump, dump_text(&[0xFFFF_FFFF; 4])).unwrap();
    fs::write(
        &layout,
        "[capture]\nsample_count = 4\n\n[signals]\nempty = 30\nx = 4\n",
    )
    .unwrap();

    let err = convert_files(&dump, &layout).unwrap_err();
    assert!(matches!(err, ConvertError::Range(_)));
}

#[test]
fn test_malformed_dump_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("capture.dump");
    let layout = dir.path().join("layout.toml");

    fs::write(&dump, "00000000:\t00000001\n00000004\t00000002\n").unwrap();
    fs::write(&layout, "[capture]\nsample_count = 1\n\n[signals]\na = 1\n").unwrap();

    let err = convert_files(&dump, &layout).unwrap_err();
    assert!(matches!(err, ConvertError::Parse { line: 2, .. }));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConvertConfig::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConvertError::Config(_)));
}
