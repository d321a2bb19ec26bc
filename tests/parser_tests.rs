use gostack::output::echo_report;
use gostack::parser::{parse_goroutine_line, parse_snapshot};
use pretty_assertions::assert_eq;

const SAMPLE: &str = include_str!("data/sample_dump.txt");

#[test]
fn test_header_without_frames() {
    let parsed = parse_snapshot("goroutine 6 [chan receive]:\n");

    assert_eq!(parsed.snapshot.len(), 1);
    let goroutine = &parsed.snapshot.goroutines()[0];
    assert_eq!(goroutine.id, 6);
    assert_eq!(goroutine.state, "chan receive");
    assert_eq!(goroutine.wait_minutes, 0);
    assert!(!goroutine.locked_to_thread);
    assert!(goroutine.frames.is_empty());
    assert_eq!(parsed.error_count, 0);
    assert_eq!(parsed.warning_count, 0);
}

#[test]
fn test_header_with_wait_time() {
    let (goroutine, warnings) = parse_goroutine_line("goroutine 12 [select, 30 minutes]:").unwrap();

    assert_eq!(goroutine.id, 12);
    assert_eq!(goroutine.state, "select");
    assert_eq!(goroutine.wait_minutes, 30);
    assert!(warnings.is_empty());
}

#[test]
fn test_sample_dump() {
    let parsed = parse_snapshot(SAMPLE);

    assert_eq!(parsed.error_count, 0);
    assert_eq!(parsed.warning_count, 0);

    let ids: Vec<u64> = parsed.snapshot.goroutines().iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![1, 18, 19, 7]);

    let reader = &parsed.snapshot.goroutines()[1];
    assert_eq!(reader.wait_minutes, 12);
    assert_eq!(reader.frames.len(), 2);
    assert!(reader.frames[1].is_created_by);
    assert_eq!(reader.frames[0].args, vec!["0xc000130000".to_string()]);

    assert!(parsed.snapshot.goroutines()[3].locked_to_thread);
}

#[test]
fn test_echo_round_trip() {
    let first = parse_snapshot(SAMPLE);
    let second = parse_snapshot(&echo_report(&first.snapshot));

    assert_eq!(second.error_count, 0);
    assert_eq!(first.snapshot.len(), second.snapshot.len());
    for (a, b) in first
        .snapshot
        .goroutines()
        .iter()
        .zip(second.snapshot.goroutines())
    {
        assert_eq!(a, b);
        assert_eq!(a.header(), b.header());
    }
}

#[test]
fn test_bad_goroutine_does_not_stop_parse() {
    let dump = "\
goroutine x [running]:
main.main()
	/app/main.go:1 +0x1

goroutine 2 [running]:
main.worker()
	/app/worker.go:5 +0x2
";
    let parsed = parse_snapshot(dump);

    assert_eq!(parsed.error_count, 1);
    assert_eq!(parsed.snapshot.len(), 1);
    assert_eq!(parsed.snapshot.goroutines()[0].id, 2);
}

#[test]
fn test_bad_file_line_drops_only_that_frame() {
    let dump = "\
goroutine 3 [select]:
main.a()
	not a location
main.b()
	/app/b.go:9 +0x3
";
    let parsed = parse_snapshot(dump);

    assert_eq!(parsed.error_count, 1);
    let goroutine = &parsed.snapshot.goroutines()[0];
    assert_eq!(goroutine.frames.len(), 1);
    assert_eq!(goroutine.frames[0].function, "main.b");
}

#[test]
fn test_unknown_state_field_is_warning() {
    let parsed = parse_snapshot("goroutine 4 [select, mystery]:\n");

    assert_eq!(parsed.error_count, 0);
    assert_eq!(parsed.warning_count, 1);
    assert_eq!(parsed.snapshot.goroutines()[0].state, "select");
}

#[test]
fn test_preamble_is_skipped() {
    let dump = "panic: boom\n\ngoroutine 1 [running]:\nmain.main()\n\t/app/main.go:3 +0x4\n";
    let parsed = parse_snapshot(dump);

    assert_eq!(parsed.error_count, 0);
    assert_eq!(parsed.snapshot.len(), 1);
}
