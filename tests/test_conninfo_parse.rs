use mollerdb::prelude::*;

const ALL_FIELDS: &str = r"host=db.moller.example hostaddr=10.0.0.5 port=5432 dbname=qwparity
    user=analyst password='my pass' connect_timeout=15 client_encoding=UTF8
    options='-c search_path=parity' application_name=mollerdb fallback_application_name=fallback
    keepalives=on keepalives_idle=30 keepalives_interval=5 keepalives_count=3
    sslmode=verify-ca sslcompression=0 sslcert=/etc/ssl/client.crt sslkey=/etc/ssl/client.key
    sslrootcert=/etc/ssl/root.crt sslcrl=/etc/ssl/root.crl requirepeer=postgres
    krbsrvname=postgres service=moller";

#[test]
fn every_recognized_key_is_assigned() -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_conninfo(ALL_FIELDS)?;

    let expected = ConnectionConfig {
        host: Some("db.moller.example".into()),
        hostaddr: Some("10.0.0.5".into()),
        port: Some(5432),
        dbname: Some("qwparity".into()),
        user: Some("analyst".into()),
        password: Some("my pass".into()),
        connect_timeout: Some(15),
        client_encoding: Some("UTF8".into()),
        options: Some("-c search_path=parity".into()),
        application_name: Some("mollerdb".into()),
        fallback_application_name: Some("fallback".into()),
        keepalives: Some(true),
        keepalives_idle: Some(30),
        keepalives_interval: Some(5),
        keepalives_count: Some(3),
        sslmode: Some(SslMode::VerifyCa),
        sslcompression: Some(false),
        sslcert: Some("/etc/ssl/client.crt".into()),
        sslkey: Some("/etc/ssl/client.key".into()),
        sslrootcert: Some("/etc/ssl/root.crt".into()),
        sslcrl: Some("/etc/ssl/root.crl".into()),
        requirepeer: Some("postgres".into()),
        krbsrvname: Some("postgres".into()),
        service: Some("moller".into()),
    };
    assert_eq!(config, expected);
    Ok(())
}

#[test]
fn parsing_is_idempotent() {
    assert_eq!(parse_conninfo(ALL_FIELDS), parse_conninfo(ALL_FIELDS));
}

#[test]
fn quoted_password_round_trips() {
    let config = parse_conninfo("password='my pass'").unwrap();
    assert_eq!(config.password.as_deref(), Some("my pass"));

    let config = parse_conninfo(r"password='my\'pass'").unwrap();
    assert_eq!(config.password.as_deref(), Some("my'pass"));
}

#[test]
fn keepalives_accepts_every_case_variant() {
    let words = [("1", true), ("true", true), ("on", true), ("yes", true)]
        .into_iter()
        .chain([("0", false), ("false", false), ("off", false), ("no", false)]);

    for (word, expected) in words {
        for variant in [word.to_string(), word.to_uppercase(), capitalize(word)] {
            let config = parse_conninfo(&format!("keepalives={variant}")).unwrap();
            assert_eq!(config.keepalives, Some(expected), "keepalives={variant}");
        }
    }
}

#[test]
fn keepalives_rejects_unknown_word() {
    assert_eq!(
        parse_conninfo("keepalives=maybe"),
        Err(ParseError::InvalidBoolean {
            key: "keepalives".into(),
            value: "maybe".into(),
        })
    );
}

#[test]
fn port_must_be_numeric() {
    assert_eq!(
        parse_conninfo("host=localhost dbname=test user=test password=test port=notanumber"),
        Err(ParseError::InvalidInteger {
            key: "port".into(),
            value: "notanumber".into(),
        })
    );
}

#[test]
fn dangling_equals_at_end_leaves_field_unset() {
    for (input, unset) in [
        ("host=localhost port=", "port"),
        ("host=localhost keepalives=", "keepalives"),
        ("host=localhost options=  ", "options"),
    ] {
        let config = parse_conninfo(input)
            .unwrap_or_else(|err| panic!("{input:?} should parse, got {err}"));
        assert_eq!(config.host.as_deref(), Some("localhost"), "{input}");
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get(unset).is_none(), "{input}: {unset} should be unset");
    }
}

#[test]
fn invalid_integer_anywhere_fails_whole_parse() {
    for key in [
        "connect_timeout",
        "keepalives_idle",
        "keepalives_interval",
        "keepalives_count",
    ] {
        let err = parse_conninfo(&format!("host=localhost {key}=-1 dbname=x")).unwrap_err();
        assert!(
            matches!(&err, ParseError::InvalidInteger { key: k, .. } if k == key),
            "{key}: {err}"
        );
    }
}

#[test]
fn sslmode_enumeration() {
    let config = parse_conninfo("sslmode=verify-full").unwrap();
    assert_eq!(config.sslmode, Some(SslMode::VerifyFull));

    let config = parse_conninfo("sslmode=bogus").unwrap();
    assert_eq!(config.sslmode, None);
}

#[test]
fn unknown_keys_are_ignored() {
    let config = parse_conninfo("foo=bar host=localhost target_session_attrs='read-write'").unwrap();
    let expected = ConnectionConfig {
        host: Some("localhost".into()),
        ..ConnectionConfig::default()
    };
    assert_eq!(config, expected);
}

#[test]
fn minimal_input_sets_only_given_fields() {
    let config = parse_conninfo("host=localhost dbname=testdb").unwrap();
    assert_eq!(config.host.as_deref(), Some("localhost"));
    assert_eq!(config.dbname.as_deref(), Some("testdb"));
    let cleared = ConnectionConfig {
        host: None,
        dbname: None,
        ..config
    };
    assert!(cleared.is_empty());
}

#[test]
fn empty_input_is_empty_config() {
    assert_eq!(parse_conninfo(""), Ok(ConnectionConfig::default()));
}

#[test]
fn json_output_omits_password_and_absent_fields() {
    let config = parse_conninfo("host=localhost password=secret sslmode=require port=5432").unwrap();
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "host": "localhost", "port": 5432, "sslmode": "require" })
    );
}

#[test]
fn parses_concurrently() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                parse_conninfo(&format!("host=node{i} port={}", 5432 + i)).unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let config = handle.join().unwrap();
        assert_eq!(config.host, Some(format!("node{i}")));
        assert_eq!(config.port, Some(5432 + u32::try_from(i).unwrap()));
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
