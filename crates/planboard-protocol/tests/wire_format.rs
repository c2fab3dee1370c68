// crates/planboard-protocol/tests/wire_format.rs
use planboard_core::{Command, EntityKey, EntityKind, SolveCommand, Update};
use planboard_protocol::{decode_update, encode_command, encode_update, parse_command};

#[test]
fn command_paths_match_the_wire_grammar() {
    assert_eq!(encode_command(&Command::Get(None)), "/get/");
    assert_eq!(
        encode_command(&Command::Get(Some(EntityKind::Buffer))),
        "/get/buffer/"
    );
    assert_eq!(
        encode_command(&Command::Register(EntityKey::resource("Paint line 1"))),
        "/register/resource/Paint%20line%201"
    );
    assert_eq!(
        encode_command(&Command::Plan(EntityKey::operation("Assemble"))),
        "/plan/operation/Assemble"
    );
    assert_eq!(
        encode_command(&Command::Solve(SolveCommand::Unplan("order/55".into()))),
        "/solve/unplan/order%2F55"
    );
    assert_eq!(
        encode_command(&Command::Solve(SolveCommand::ReplanBackward)),
        "/solve/replan/backward/"
    );
    assert_eq!(encode_command(&Command::Status), "/status/");
}

#[test]
fn every_command_survives_the_round_trip() {
    let commands = vec![
        Command::Get(None),
        Command::Get(Some(EntityKind::Demand)),
        Command::Plan(EntityKey::buffer("paint @ site/2")),
        Command::Register(EntityKey::resource("M1")),
        Command::Unregister(EntityKey::operation("Ship A/B")),
        Command::Solve(SolveCommand::Erase),
        Command::Solve(SolveCommand::ReplanForward),
        Command::Solve(SolveCommand::ReplanBackward),
        Command::Solve(SolveCommand::DemandForward("D 01".into())),
        Command::Solve(SolveCommand::DemandBackward("D%2".into())),
        Command::Solve(SolveCommand::Unplan("order/55".into())),
        Command::Chat("shift moved to tomorrow".into()),
        Command::Status,
    ];
    for command in commands {
        let frame = encode_command(&command);
        let back = parse_command(&frame).unwrap_or_else(|e| panic!("{frame}: {e}"));
        assert_eq!(back, command, "frame {frame}");
    }
}

#[test]
fn chat_text_is_carried_verbatim() {
    // Slashes and percent signs in chat are message text, not escapes.
    let parsed = parse_command("/chat/50% done / rest tomorrow").expect("parse");
    assert_eq!(parsed, Command::Chat("50% done / rest tomorrow".into()));
    assert_eq!(
        encode_command(&Command::Chat("50% done / rest tomorrow".into())),
        "/chat/50% done / rest tomorrow"
    );
}

#[test]
fn bad_command_frames_are_rejected() {
    assert!(parse_command("").is_err());
    assert!(parse_command("get/").is_err());
    assert!(parse_command("/quote/resource/M1").is_err());
    assert!(parse_command("/plan/resource").is_err());
    assert!(parse_command("/register/factory/X").is_err());
    assert!(parse_command("/solve/levitate/").is_err());
    assert!(parse_command("/register/resource/").is_err());

    let long = format!("/plan/resource/{}", "x".repeat(4096));
    assert!(parse_command(&long).is_err());
}

#[test]
fn envelopes_decode_by_category() {
    let update = decode_update(
        r#"{"category":"name","operations":["Assemble","Paint"],"resources":["M1"]}"#,
    )
    .expect("decode");
    match update {
        Update::Name(catalog) => {
            assert_eq!(catalog.operations, vec!["Assemble", "Paint"]);
            assert_eq!(catalog.resources, vec!["M1"]);
            assert!(catalog.demands.is_empty());
        }
        other => panic!("expected a catalog, got {other:?}"),
    }

    let update = decode_update(
        r#"{"category":"plan","resources":[{"name":"M1","loadplans":[
            {"start":"2024-03-01T08:00:00Z","end":"2024-03-01T16:00:00Z","quantity":1.0}]}]}"#,
    )
    .expect("decode");
    match update {
        Update::Plan(plan) => {
            assert_eq!(plan.resources.len(), 1);
            assert_eq!(plan.resources[0].name, "M1");
            assert_eq!(plan.resources[0].loadplans[0].quantity, 1.0);
        }
        other => panic!("expected plan data, got {other:?}"),
    }

    let update = decode_update(
        r#"{"category":"chat","messages":[
            {"date":"2024-03-01T08:00:00Z","name":"paul","value":"morning"}]}"#,
    )
    .expect("decode");
    match update {
        Update::Chat { messages } => {
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].name, "paul");
            assert_eq!(messages[0].value, "morning");
        }
        other => panic!("expected chat, got {other:?}"),
    }
}

#[test]
fn unknown_categories_decode_without_error() {
    let update = decode_update(r#"{"category":"forecast","horizon":12}"#).expect("decode");
    assert_eq!(update, Update::Unknown);
}

#[test]
fn bad_envelopes_fail_decode() {
    assert!(decode_update("morning everyone").is_err());
    assert!(decode_update("[1,2,3]").is_err());
    assert!(decode_update(r#"{"messages":[]}"#).is_err());
}

#[test]
fn encoded_envelopes_decode_back() {
    let update = Update::Chat {
        messages: vec![planboard_core::ChatMessage {
            date: chrono::Utc::now(),
            name: "paul".into(),
            value: "done for today".into(),
        }],
    };
    let frame = encode_update(&update).expect("encode");
    assert_eq!(decode_update(&frame).expect("decode"), update);
}
