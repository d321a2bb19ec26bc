use gostack::aggregator::{group, merge};
use gostack::parser::parse_snapshot;

const SAMPLE: &str = include_str!("data/sample_dump.txt");

#[test]
fn test_identical_stacks_share_a_group() {
    let grouped = group(parse_snapshot(SAMPLE).snapshot);

    assert_eq!(grouped.goroutine_count(), 4);
    assert_eq!(grouped.len(), 3);

    let ranked = grouped.ranked();
    assert_eq!(ranked[0].len(), 2);
    let ids: Vec<u64> = ranked[0].goroutines().iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![18, 19]);
}

#[test]
fn test_groups_partition_the_snapshot() {
    let snapshot = parse_snapshot(SAMPLE).snapshot;
    let grouped = group(snapshot.clone());

    let total: usize = grouped.groups().iter().map(|g| g.len()).sum();
    assert_eq!(total, snapshot.len());

    for goroutine in snapshot.goroutines() {
        let owner = grouped.find(goroutine).unwrap();
        assert!(owner.goroutines().iter().all(|member| member == goroutine));
    }
}

#[test]
fn test_regrouping_is_stable() {
    let grouped = group(parse_snapshot(SAMPLE).snapshot);
    let regrouped = group(grouped.flatten());

    assert_eq!(grouped.len(), regrouped.len());
    for (a, b) in grouped.groups().iter().zip(regrouped.groups()) {
        assert_eq!(a.signature(), b.signature());
        assert_eq!(a.len(), b.len());
    }
}

#[test]
fn test_same_location_different_function_is_separate_group() {
    let dump = "\
goroutine 1 [select]:
main.a()
	/app/x.go:1 +0x1

goroutine 2 [select]:
main.b()
	/app/x.go:1 +0x1
";
    let grouped = group(parse_snapshot(dump).snapshot);

    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped.groups()[0].signature(), grouped.groups()[1].signature());
}

#[test]
fn test_merge_adds_counts() {
    let first = group(parse_snapshot(SAMPLE).snapshot);
    let second = group(parse_snapshot(SAMPLE).snapshot);

    let merged = merge(vec![first, second]);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.goroutine_count(), 8);
}
