use proptest::prelude::*;
use sysexec::exec::{ArgumentError, ArgumentVector};

#[test]
fn empty_vector_is_rejected() {
    let result = ArgumentVector::from_strings(Vec::<String>::new());

    assert_eq!(result, Err(ArgumentError::Empty));
}

#[test]
fn interior_nul_is_rejected_with_index() {
    let result = ArgumentVector::new("/bin/echo", ["ok", "bad\0arg"]);

    assert_eq!(result, Err(ArgumentError::InteriorNul { index: 2 }));
}

#[test]
fn program_and_args_are_split() {
    let argv = ArgumentVector::new("/bin/echo", ["hello", "world"]).unwrap();

    assert_eq!(argv.program().to_str().unwrap(), "/bin/echo");
    assert_eq!(argv.args().len(), 2);
    assert_eq!(argv.len(), 3);
    assert_eq!(argv.to_string(), "/bin/echo hello world");
    assert_eq!(argv.program_display(), "/bin/echo");
}

#[test]
fn program_alone_is_valid() {
    let argv = ArgumentVector::try_from(vec!["/bin/true".to_string()]).unwrap();

    assert_eq!(argv.len(), 1);
    assert!(argv.args().is_empty());
    assert!(!argv.is_empty());
}

proptest! {
    #[test]
    fn nul_free_sequences_round_trip_in_order(
        items in proptest::collection::vec("[a-zA-Z0-9 $*./-]{0,16}", 1..8)
    ) {
        let argv = ArgumentVector::from_strings(items.clone()).unwrap();

        let rendered: Vec<String> = argv
            .as_slice()
            .iter()
            .map(|a| a.to_str().unwrap().to_string())
            .collect();
        prop_assert_eq!(rendered, items);
    }

    #[test]
    fn first_nul_position_is_reported(
        mut items in proptest::collection::vec("[a-z]{1,8}", 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(items.len());
        items[index].push('\0');

        let result = ArgumentVector::from_strings(items);
        prop_assert_eq!(result, Err(ArgumentError::InteriorNul { index }));
    }
}
