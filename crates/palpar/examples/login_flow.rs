//! Page-object walkthrough over a scripted device.
//!
//! Run with: `cargo run --example login_flow`
//!
//! No emulator needed: the device is a scripted double serving canned
//! UiAutomator hierarchies, which is also how page objects built on
//! palpar are unit-tested.

use palpar::prelude::*;
use std::time::Duration;

const WELCOME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hierarchy class="hierarchy" width="1080" height="2400">
  <node class="android.widget.FrameLayout" resource-id="com.example.vault:id/welcome_screen" bounds="[0,0][1080,2400]" enabled="true">
    <node class="android.widget.Button" resource-id="com.example.vault:id/login" text="Log in" bounds="[40,2000][1040,2140]" enabled="true"/>
  </node>
</hierarchy>"#;

const LOGIN_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hierarchy class="hierarchy" width="1080" height="2400">
  <node class="android.widget.FrameLayout" resource-id="com.example.vault:id/login_screen" bounds="[0,0][1080,2400]" enabled="true">
    <node class="android.widget.EditText" resource-id="com.example.vault:id/email" text="Email address" bounds="[40,500][1040,620]" enabled="true"/>
    <node class="android.widget.Button" resource-id="com.example.vault:id/continue_button" text="Continue" bounds="[40,2000][1040,2140]" enabled="true"/>
  </node>
</hierarchy>"#;

const LOGIN_FILLED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hierarchy class="hierarchy" width="1080" height="2400">
  <node class="android.widget.FrameLayout" resource-id="com.example.vault:id/login_screen" bounds="[0,0][1080,2400]" enabled="true">
    <node class="android.widget.EditText" resource-id="com.example.vault:id/email" text="user@example.com" bounds="[40,500][1040,620]" enabled="true"/>
    <node class="android.widget.Button" resource-id="com.example.vault:id/continue_button" text="Continue" bounds="[40,2000][1040,2140]" enabled="true"/>
  </node>
</hierarchy>"#;

struct WelcomeScreen {
    login: View,
}

impl WelcomeScreen {
    fn open(session: &Session) -> PalparResult<Self> {
        let screen = View::screen(
            session,
            "WelcomeScreen",
            Query::new().id("welcome_screen"),
        )?;
        let login = View::builder(session, "Login")
            .parent(&screen)
            .query(Query::new().id_and_text("login", "Log in"))
            .build()?;
        Ok(Self { login })
    }
}

struct LoginPage {
    email: TextInput,
}

impl LoginPage {
    fn open(session: &Session) -> PalparResult<Self> {
        let screen = View::screen(session, "LoginPage", Query::new().id("login_screen"))?;
        let email = TextInput::build(
            View::builder(session, "Email")
                .parent(&screen)
                .query(Query::new().id("email")),
            "Email address",
        )?;
        Ok(Self { email })
    }
}

fn main() -> PalparResult<()> {
    palpar::logging::init_with_filter("palpar=debug");

    let session = Session::new(
        SessionConfig::new(Platform::Android, "com.example.vault")
            .without_settle_delays()
            .with_wait_timeout(Duration::from_millis(100)),
        Box::new(
            ScriptedDevice::new()
                .with_frame(WELCOME_XML)
                .with_frame(LOGIN_XML)
                .with_frame(LOGIN_FILLED_XML)
                .with_frame_per_gesture()
                .with_keyboard_visible(true)
                .into_shared(),
        ),
    );

    let welcome = WelcomeScreen::open(&session)?;
    welcome.login.assert_enabled()?.tap()?;

    let login = LoginPage::open(&session)?;
    login.email.enter_text_with("user@example.com", KeyboardDismiss::Never)?;
    login.email.assert_text_contains("@example.com")?;

    println!("login flow drove the scripted device end to end");
    Ok(())
}
