//! Tests for sending password reset emails.

use futures::Future;
use pwreset_notifier::{Error, SENDER_NAME, SUBJECT};

mod common;

use self::common::{
    ConnectionRefused,
    Recorder,
    Refusing,
    notifier,
    notifier_without_mailer,
    run,
};

#[test]
fn send_reset_email() {
    let recorder = Recorder::default();
    let transport = recorder.clone();

    run(move || notifier(transport)
        .send_reset_email("user@example.com", "abc123"))
        .expect("message should be accepted");

    let messages = recorder.messages();
    assert_eq!(messages.len(), 1);

    let message = &messages[0];
    assert_eq!(message.to.address, "user@example.com");
    assert_eq!(message.subject, SUBJECT);
    assert_eq!(message.from.name.as_ref().map(String::as_str), Some(SENDER_NAME));
    assert_eq!(message.from.address, "accounts@example.com");
    assert!(message.html.contains("https://app.example.com/changePassword/abc123"));
    assert!(message.text.contains("https://app.example.com/changePassword/abc123"));
    assert!(message.html.contains("15 minutes"));
}

#[test]
fn transport_error_is_propagated() {
    let result = run(|| notifier(Refusing)
        .send_reset_email("user@example.com", "abc123"));

    match result {
        Err(Error::Transport(err)) => {
            let err = err.downcast_ref::<ConnectionRefused>()
                .expect("transport error should be passed through unchanged");
            assert_eq!(err.host, "smtp.example.com");
            assert_eq!(err.to_string(), "connection refused by smtp.example.com");
        }
        Err(err) => panic!("expected transport error, got {}", err),
        Ok(()) => panic!("message should have been rejected"),
    }
}

#[test]
fn repeated_calls_send_repeated_emails() {
    let recorder = Recorder::default();
    let transport = recorder.clone();

    run(move || {
        let notifier = notifier(transport);
        notifier.send_reset_email("user@example.com", "abc123")
            .and_then(move |_| notifier.send_reset_email("user@example.com", "abc123"))
    }).unwrap();

    let messages = recorder.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].html, messages[1].html);
}

#[test]
fn concurrent_calls_are_independent() {
    let recorder = Recorder::default();
    let transport = recorder.clone();

    run(move || {
        let notifier = notifier(transport);
        notifier.send_reset_email("alice@example.com", "token-alice")
            .join(notifier.send_reset_email("bob@example.com", "token-bob"))
    }).unwrap();

    let mut messages = recorder.messages();
    messages.sort_by(|a, b| a.to.address.cmp(&b.to.address));
    assert_eq!(messages.len(), 2);

    assert_eq!(messages[0].to.address, "alice@example.com");
    assert!(messages[0].html.contains("/changePassword/token-alice"));
    assert!(!messages[0].html.contains("token-bob"));

    assert_eq!(messages[1].to.address, "bob@example.com");
    assert!(messages[1].html.contains("/changePassword/token-bob"));
    assert!(!messages[1].html.contains("token-alice"));
}

#[test]
fn one_failure_does_not_affect_other_notifiers() {
    let recorder = Recorder::default();
    let transport = recorder.clone();

    let failed = run(move || {
        let failing = notifier(Refusing);
        let working = notifier(transport);
        failing.send_reset_email("user@example.com", "abc123")
            .then(move |failed| working.send_reset_email("user@example.com", "def456")
                .map(move |()| failed.is_err()))
    }).unwrap();

    assert!(failed);
    assert_eq!(recorder.messages().len(), 1);
}

#[test]
fn malformed_recipient_is_rejected() {
    let inputs = [
        "",
        "not an email",
        "user@example.com garbage",
        "victim@example.com\nattacker@evil.com",
        "a@b\r\nBcc: evil@x.com",
        "user@example.com>",
        "<user@example.com",
        "User <user@example.com>",
    ];

    for &input in &inputs {
        let recorder = Recorder::default();
        let transport = recorder.clone();

        let result = run(move || notifier(transport)
            .send_reset_email(input, "abc123"));

        match result {
            Err(Error::InvalidRecipient(email)) => assert_eq!(email, input),
            Err(err) => panic!("{:?}: expected invalid recipient, got {}", input, err),
            Ok(()) => panic!("{:?} should have been rejected", input),
        }
        assert!(recorder.messages().is_empty(), "{:?} reached transport", input);
    }
}

#[test]
fn recipient_is_used_as_given() {
    let recorder = Recorder::default();
    let transport = recorder.clone();

    run(move || notifier(transport)
        .send_reset_email("first.last+tag@sub.example.com", "abc123"))
        .unwrap();

    let messages = recorder.messages();
    assert_eq!(messages[0].to.address, "first.last+tag@sub.example.com");
    assert!(messages[0].to.name.is_none());
}

#[test]
fn stopped_mailer_is_reported() {
    let result = run(|| notifier_without_mailer()
        .send_reset_email("user@example.com", "abc123"));

    match result {
        Err(Error::Mailbox(_)) => (),
        Err(err) => panic!("expected mailbox error, got {}", err),
        Ok(()) => panic!("message should not have been sent"),
    }
}

#[test]
fn token_markup_is_escaped() {
    let recorder = Recorder::default();
    let transport = recorder.clone();

    run(move || notifier(transport)
        .send_reset_email("user@example.com", "x\"><script>alert(1)</script>"))
        .unwrap();

    let message = &recorder.messages()[0];
    assert!(!message.html.contains("<script>"));
    assert!(message.html.contains("/changePassword/x&quot;&gt;&lt;script&gt;"));
}
