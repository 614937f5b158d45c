//! Property-based tests for the path algebra.

use super::PurePath;
use crate::flavor::Flavor;
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,12}(\\.[a-z]{1,4}){0,2}"
}

fn flavor_strategy() -> impl Strategy<Value = Flavor> {
    prop_oneof![Just(Flavor::Posix), Just(Flavor::Windows)]
}

fn anchor_strategy(flavor: Flavor) -> BoxedStrategy<String> {
    match flavor {
        Flavor::Posix => prop_oneof![Just(""), Just("/"), Just("//")]
            .prop_map(String::from)
            .boxed(),
        Flavor::Windows => prop_oneof![
            Just(""),
            Just("\\"),
            Just("c:"),
            Just("c:\\"),
            Just("\\\\srv\\share\\"),
            Just("\\\\?\\d:\\"),
        ]
        .prop_map(String::from)
        .boxed(),
    }
}

// Raw input strings with noise: doubled separators, `.` segments and the
// alternate separator where the flavor has one.
fn raw_inputs_strategy() -> impl Strategy<Value = (Flavor, Vec<String>)> {
    flavor_strategy().prop_flat_map(|flavor| {
        let piece = prop_oneof![
            4 => segment_strategy(),
            1 => Just(".".to_string()),
            1 => Just(String::new()),
        ];
        let sep = prop_oneof![Just(flavor.separator()), Just(flavor.alt_separator().unwrap_or('/'))];
        let input = prop::collection::vec((piece, sep), 0..6).prop_map(|pieces| {
            pieces
                .into_iter()
                .map(|(p, s)| format!("{p}{s}"))
                .collect::<String>()
        });
        (
            Just(flavor),
            anchor_strategy(flavor),
            prop::collection::vec(input, 0..4),
        )
            .prop_map(|(flavor, anchor, mut inputs)| {
                inputs.insert(0, anchor);
                (flavor, inputs)
            })
    })
}

fn anchored_path_strategy() -> impl Strategy<Value = (PurePath, usize)> {
    (flavor_strategy(), prop::collection::vec(segment_strategy(), 0..8)).prop_flat_map(
        |(flavor, segments)| {
            let anchor = match flavor {
                Flavor::Posix => "/",
                Flavor::Windows => "c:\\",
            };
            let depth = segments.len();
            let mut inputs = vec![anchor.to_string()];
            inputs.extend(segments);
            Just((PurePath::with_flavor(flavor, inputs), depth))
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // parse(render(parse(inputs))) == parse(inputs)
    #[test]
    fn parse_render_round_trip((flavor, inputs) in raw_inputs_strategy()) {
        let once = PurePath::with_flavor(flavor, &inputs);
        let twice = PurePath::with_flavor(flavor, [once.to_string()]);
        prop_assert_eq!(once, twice);
    }

    // Parsed parts never carry empty or `.` segments
    #[test]
    fn parts_are_plain_segments((flavor, inputs) in raw_inputs_strategy()) {
        let p = PurePath::with_flavor(flavor, &inputs);
        let skip = usize::from(p.is_anchored());
        for part in &p.parts()[skip..] {
            prop_assert!(!part.is_empty());
            prop_assert_ne!(part.as_str(), ".");
        }
        if p.is_anchored() {
            prop_assert_eq!(&p.parts()[0], &p.anchor());
        }
    }

    // `parent` applied depth times reaches the anchor, then stays put
    #[test]
    fn parent_reaches_anchor_fixed_point((path, depth) in anchored_path_strategy()) {
        let mut current = path.clone();
        for _ in 0..depth {
            current = current.parent();
        }
        prop_assert_eq!(current.to_string(), path.anchor());
        prop_assert_eq!(current.parent(), current.clone());
        prop_assert_eq!(path.parents().len(), depth);
    }

    // base.join(p.relative_to(base)) == p
    #[test]
    fn relative_to_and_join_are_inverse(
        (path, depth) in anchored_path_strategy(),
        cut in 0usize..8,
    ) {
        let cut = cut.min(depth);
        let mut base = path.clone();
        for _ in 0..cut {
            base = base.parent();
        }
        let rel = path.relative_to(&base).unwrap();
        prop_assert!(!rel.is_anchored());
        prop_assert_eq!(base.join_path([&rel]).clean().to_string(), path.clean().to_string());
    }

    // Stripping then restoring a suffix is the identity on the name
    #[test]
    fn with_suffix_restores_name(stem in "[a-z]{1,8}", ext in "\\.[a-z]{1,4}") {
        let path = PurePath::posix(["dir", &format!("{stem}{ext}")]);
        let old = path.suffix().to_string();
        let stripped = path.with_suffix("").unwrap();
        prop_assert_eq!(stripped.with_suffix(&old).unwrap(), path);
    }
}
