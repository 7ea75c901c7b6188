//! Property-based tests for palpar.
//!
//! Uses proptest to verify the framework's core invariants over arbitrary
//! inputs: cache invalidation across operation sequences, XPath literal
//! escaping, snapshot equivalence tolerance, and template matching.

use palpar::prelude::*;
use proptest::prelude::*;
use std::time::Duration;

const XML: &str = r#"<hierarchy class="hierarchy" width="1080" height="2400"/>"#;

fn test_session() -> Session {
    Session::new(
        SessionConfig::new(Platform::Android, "com.example.app")
            .without_settle_delays()
            .with_wait_timeout(Duration::ZERO),
        Box::new(ScriptedDevice::new().with_frame(XML)),
    )
}

/// Every device-mutating operation the session exposes
#[derive(Debug, Clone, Copy)]
enum MutatingOp {
    Tap,
    Drag,
    EnterText,
    ClearText,
    PressKey,
    HideKeyboard,
    LaunchApp,
    TerminateApp,
    DeepLink,
}

impl MutatingOp {
    fn run(self, session: &Session) -> PalparResult<()> {
        match self {
            Self::Tap => session.tap(10, 10, 1),
            Self::Drag => session.drag(Point::new(0, 0), Point::new(0, 100), None),
            Self::EnterText => session.enter_text("text"),
            Self::ClearText => session.clear_text(),
            Self::PressKey => session.press_key(DeviceKey::Back),
            Self::HideKeyboard => session.hide_keyboard(),
            Self::LaunchApp => session.launch_app("com.example.app"),
            Self::TerminateApp => session.terminate_app("com.example.app"),
            Self::DeepLink => session.open_deep_link("app://vault"),
        }
    }
}

fn mutating_op() -> impl Strategy<Value = MutatingOp> {
    prop_oneof![
        Just(MutatingOp::Tap),
        Just(MutatingOp::Drag),
        Just(MutatingOp::EnterText),
        Just(MutatingOp::ClearText),
        Just(MutatingOp::PressKey),
        Just(MutatingOp::HideKeyboard),
        Just(MutatingOp::LaunchApp),
        Just(MutatingOp::TerminateApp),
        Just(MutatingOp::DeepLink),
    ]
}

proptest! {
    /// After any sequence of mutating operations interleaved with reads,
    /// a read immediately following a mutation always fetches live.
    #[test]
    fn prop_mutations_always_invalidate(ops in prop::collection::vec(mutating_op(), 1..12)) {
        let session = test_session();

        for op in ops {
            // Warm the cache, mutate, and require the cache to be gone.
            session.screen_xml("warm", false).unwrap();
            prop_assert!(session.cached_source().is_some());

            op.run(&session).unwrap();
            prop_assert!(
                session.cached_source().is_none(),
                "{op:?} left a stale page source behind"
            );
        }
    }

    /// An XPath literal built from any text (including apostrophes) must
    /// match an XML node carrying exactly that text.
    #[test]
    fn prop_xpath_literal_round_trips(text in "[a-zA-Z0-9 ']{1,24}") {
        let xml = format!(
            r#"<hierarchy class="hierarchy" width="10" height="10">
  <node class="android.widget.TextView" text="{text}" bounds="[0,0][5,5]" enabled="true"/>
</hierarchy>"#
        );
        let xpath = format!("//*[@text={}]", xpath_literal(&text));
        let found = palpar::xml::evaluate_xpath(
            Platform::Android.dialect(),
            "Probe",
            &xpath,
            &xml,
        )
        .unwrap();
        prop_assert_eq!(found.len(), 1);
        prop_assert_eq!(found[0].text.clone(), text);
    }

    /// Geometry drift within the tolerance never breaks equivalence;
    /// drift beyond it always does.
    #[test]
    fn prop_viewdata_tolerance(
        x in 0i32..500,
        y in 0i32..500,
        dx in -5i32..=5,
        dy in -5i32..=5,
        excess in 6i32..50,
    ) {
        let base = ViewData {
            rect: Rect::new(x, y, 100, 50),
            text: "Save".to_string(),
            enabled: true,
            selected: false,
            checked: false,
            class: "android.widget.Button".to_string(),
            id: "save".to_string(),
        };

        let mut drifted = base.clone();
        drifted.rect = Rect::new(x + dx, y + dy, 100, 50);
        prop_assert!(base.matches(&drifted));

        let mut out_of_tolerance = base.clone();
        out_of_tolerance.rect = Rect::new(x + excess, y, 100, 50);
        prop_assert!(!base.matches(&out_of_tolerance));
    }

    /// A value assembled from a template's literal parts always matches
    /// the template, whatever fills the placeholders.
    #[test]
    fn prop_template_matches_its_own_expansion(
        prefix in "[a-zA-Z ().+*?]{0,10}",
        filler in "[a-zA-Z0-9]{1,8}",
        suffix in "[a-zA-Z ().+*?]{0,10}",
    ) {
        let template = format!("{prefix}{{0}}{suffix}");
        let value = format!("{prefix}{filler}{suffix}");
        prop_assert!(
            palpar::text::matches_template(&value, &template),
            "'{}' should match '{}'",
            value,
            template
        );
    }

    /// Extracted placeholder values round-trip through the template.
    #[test]
    fn prop_template_extraction_round_trips(
        count in 0u32..1000,
        total in 0u32..1000,
    ) {
        let value = format!("Showing {count} of {total} results");
        let values =
            palpar::text::extract_template_values(&value, "Showing {0} of {1} results");
        prop_assert_eq!(values, vec![count.to_string(), total.to_string()]);
    }
}
