use inflow_core::{JobParameters, NotifyTarget, ParamError};

fn base() -> JobParameters {
    JobParameters {
        destination: "Example.png".into(),
        source_url: "https://example.com/source.png".into(),
        actor: "Alice".into(),
        comment: "imported".into(),
        page_text: "body".into(),
        watch: false,
        ignore_warnings: false,
        notify: NotifyTarget::SessionMailbox {
            session_id: "sess-1".into(),
            session_key: "job-key".into(),
        },
    }
}

#[test]
fn valid_parameters_pass() {
    assert_eq!(base().validate(), Ok(()));
}

#[test]
fn direct_message_needs_no_session() {
    let params = JobParameters {
        notify: NotifyTarget::DirectMessage,
        ..base()
    };
    assert_eq!(params.validate(), Ok(()));
}

#[test]
fn blank_destination_is_rejected() {
    let params = JobParameters {
        destination: "   ".into(),
        ..base()
    };
    assert_eq!(params.validate(), Err(ParamError::EmptyDestination));
}

#[test]
fn blank_actor_is_rejected() {
    let params = JobParameters {
        actor: String::new(),
        ..base()
    };
    assert_eq!(params.validate(), Err(ParamError::EmptyActor));
}

#[test]
fn unparseable_source_url_is_rejected() {
    let params = JobParameters {
        source_url: "not a url".into(),
        ..base()
    };
    assert!(matches!(
        params.validate(),
        Err(ParamError::InvalidSourceUrl { .. })
    ));
}

#[test]
fn non_http_scheme_is_rejected() {
    let params = JobParameters {
        source_url: "ftp://example.com/file".into(),
        ..base()
    };
    assert_eq!(
        params.validate(),
        Err(ParamError::UnsupportedScheme {
            scheme: "ftp".into()
        })
    );
}

#[test]
fn mailbox_target_needs_both_session_fields() {
    let params = JobParameters {
        notify: NotifyTarget::SessionMailbox {
            session_id: "sess-1".into(),
            session_key: "  ".into(),
        },
        ..base()
    };
    assert_eq!(params.validate(), Err(ParamError::EmptySessionAddress));
}
