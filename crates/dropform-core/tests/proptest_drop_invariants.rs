//! Property-based invariants for drop parsing and geometry.
//!
//! 1. Any whitespace-separated list of absolute paths parses to the same
//!    paths, in order.
//! 2. Backslash-escaped spaces survive parsing.
//! 3. Text containing a relative token is never a drop.
//! 4. Rect intersection is commutative and contained in both inputs.

use std::path::PathBuf;

use dropform_core::drop::DropEvent;
use dropform_core::geometry::Rect;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,12}"
}

fn abs_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..4).prop_map(|segs| format!("/{}", segs.join("/")))
}

proptest! {
    #[test]
    fn path_lists_parse_in_order(paths in prop::collection::vec(abs_path(), 1..6), sep in "[ \n\t]{1,3}") {
        let text = paths.join(&sep);
        let drop = DropEvent::from_paste(&text).expect("absolute paths are a drop");
        let expected: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        prop_assert_eq!(drop.paths, expected);
    }

    #[test]
    fn escaped_spaces_survive(a in segment(), b in segment()) {
        let raw = format!("/{a} {b}.png");
        let escaped = raw.replace(' ', "\\ ");
        let drop = DropEvent::from_paste(&escaped).expect("escaped path is a drop");
        prop_assert_eq!(drop.paths, vec![PathBuf::from(raw)]);
    }

    #[test]
    fn relative_token_poisons_drop(paths in prop::collection::vec(abs_path(), 0..3), word in "[a-z]{1,8}") {
        let mut tokens = paths.clone();
        tokens.push(word);
        prop_assert!(DropEvent::from_paste(&tokens.join(" ")).is_none());
    }

    #[test]
    fn intersection_commutative_and_contained(
        a in (0u16..200, 0u16..200, 0u16..200, 0u16..200),
        b in (0u16..200, 0u16..200, 0u16..200, 0u16..200),
    ) {
        let ra = Rect::new(a.0, a.1, a.2, a.3);
        let rb = Rect::new(b.0, b.1, b.2, b.3);
        let i = ra.intersection(&rb);
        prop_assert_eq!(i, rb.intersection(&ra));
        if !i.is_empty() {
            prop_assert!(i.x >= ra.x && i.right() <= ra.right());
            prop_assert!(i.y >= rb.y && i.bottom() <= rb.bottom());
        }
    }
}
