use super::fixtures::{default_match, json_user, SETUPS};
use graphfrag::{CompilerConfig, ExtractError, FragmentCompiler, JsonRecord, Label, MatchClause};
use serde_json::json;

fn user_label() -> Label {
    Label::from("user")
}

fn alias_field(alias: &str, field: &str) -> String {
    format!("{}.{} = ${}", alias, field, field)
}

#[test]
fn test_create_node_suite() {
    struct Case {
        name: &'static str,
        expected: fn(&str) -> String,
        with_return: bool,
        excludes: &'static [&'static str],
    }

    let cases = [
        Case {
            name: "create without any excludes and a return",
            expected: |v| format!("CREATE ({v}:user {{id: $id, name: $name, email: $email}}) RETURN {v}"),
            with_return: true,
            excludes: &[],
        },
        Case {
            name: "create without any excludes and without a return",
            expected: |v| format!("CREATE ({v}:user {{id: $id, name: $name, email: $email}})"),
            with_return: false,
            excludes: &[],
        },
        Case {
            name: "create while excluding id and a return",
            expected: |v| format!("CREATE ({v}:user {{name: $name, email: $email}}) RETURN {v}"),
            with_return: true,
            excludes: &["id"],
        },
        Case {
            name: "create while excluding id and without a return",
            expected: |v| format!("CREATE ({v}:user {{name: $name, email: $email}})"),
            with_return: false,
            excludes: &["id"],
        },
        Case {
            name: "create while excluding everything and with a return",
            expected: |v| format!("CREATE ({v}:user ) RETURN {v}"),
            with_return: true,
            excludes: &["id", "name", "email"],
        },
        Case {
            name: "create while excluding everything and without a return",
            expected: |v| format!("CREATE ({v}:user )"),
            with_return: false,
            excludes: &["id", "name", "email"],
        },
    ];

    for setup in SETUPS {
        let compiler = setup.compiler();
        let user = setup.user("someeyedee");
        let variable = compiler.config().variable.clone();

        for case in &cases {
            let fragment = compiler
                .create_node(&*user, &user_label(), case.with_return, case.excludes)
                .unwrap();
            assert_eq!(fragment.query, (case.expected)(&variable), "{}", case.name);
        }
    }
}

#[test]
fn test_update_node_suite() {
    struct Case {
        name: &'static str,
        expected: fn(&str) -> String,
        match_clause: MatchClause,
        with_return: bool,
        excludes: &'static [&'static str],
    }

    let cases = [
        Case {
            name: "update with default match clause and return",
            expected: |v| {
                format!(
                    "MERGE ({v}:user) WHERE id({v}) = $id SET {}, {}, {} RETURN {v}",
                    alias_field(v, "id"),
                    alias_field(v, "name"),
                    alias_field(v, "email"),
                )
            },
            match_clause: default_match(),
            with_return: true,
            excludes: &[],
        },
        Case {
            name: "update with default match clause and without a return",
            expected: |v| {
                format!(
                    "MERGE ({v}:user) WHERE id({v}) = $id SET {}, {}, {}",
                    alias_field(v, "id"),
                    alias_field(v, "name"),
                    alias_field(v, "email"),
                )
            },
            match_clause: default_match(),
            with_return: false,
            excludes: &[],
        },
        Case {
            name: "update with default match clause while ignoring id and return",
            expected: |v| {
                format!(
                    "MERGE ({v}:user) WHERE id({v}) = $id SET {}, {} RETURN {v}",
                    alias_field(v, "name"),
                    alias_field(v, "email"),
                )
            },
            match_clause: default_match(),
            with_return: true,
            excludes: &["id"],
        },
        Case {
            name: "update with default match clause while ignoring id and without a return",
            expected: |v| {
                format!(
                    "MERGE ({v}:user) WHERE id({v}) = $id SET {}, {}",
                    alias_field(v, "name"),
                    alias_field(v, "email"),
                )
            },
            match_clause: default_match(),
            with_return: false,
            excludes: &["id"],
        },
        Case {
            name: "update with custom match clause while ignoring id and return",
            expected: |v| {
                format!(
                    "MERGE ({v}:user) WHERE custom = $custom SET {}, {} RETURN {v}",
                    alias_field(v, "name"),
                    alias_field(v, "email"),
                )
            },
            match_clause: MatchClause::new().with("custom", "custom"),
            with_return: true,
            excludes: &["id"],
        },
        Case {
            name: "update with custom match clause while ignoring id and without a return",
            expected: |v| {
                format!(
                    "MERGE ({v}:user) WHERE custom = $custom SET {}, {}",
                    alias_field(v, "name"),
                    alias_field(v, "email"),
                )
            },
            match_clause: MatchClause::new().with("custom", "custom"),
            with_return: false,
            excludes: &["id"],
        },
    ];

    for setup in SETUPS {
        let compiler = setup.compiler();
        let user = setup.user("someeyedee");
        let variable = compiler.config().variable.clone();

        for case in &cases {
            let expected = (case.expected)(&variable);

            let with_match = compiler
                .update_node_with_match(
                    &*user,
                    &user_label(),
                    &case.match_clause,
                    case.with_return,
                    case.excludes,
                )
                .unwrap();
            assert_eq!(with_match.query, expected, "update_node_with_match: {}", case.name);

            // update_node only ever uses the configured clause
            if case.match_clause == default_match() {
                let default = compiler
                    .update_node(&*user, &user_label(), case.with_return, case.excludes)
                    .unwrap();
                assert_eq!(default.query, expected, "update_node: {}", case.name);
            }
        }
    }
}

#[test]
fn test_delete_node_suite() {
    struct Case {
        name: &'static str,
        expected: fn(&str) -> String,
        match_clause: MatchClause,
        detach: bool,
    }

    let cases = [
        Case {
            name: "delete node with custom matching",
            expected: |v| format!("MATCH ({v}) WHERE abcDEFG = $a DELETE {v}"),
            match_clause: MatchClause::new().with("abcDEFG", "a"),
            detach: false,
        },
        Case {
            name: "detach delete node with custom matching",
            expected: |v| format!("MATCH ({v}) WHERE abcDEFG = $a DETACH DELETE {v}"),
            match_clause: MatchClause::new().with("abcDEFG", "a"),
            detach: true,
        },
        Case {
            name: "delete node with default matching",
            expected: |v| format!("MATCH ({v}) WHERE id({v}) = $id DELETE {v}"),
            match_clause: default_match(),
            detach: false,
        },
        Case {
            name: "detach delete node with default matching",
            expected: |v| format!("MATCH ({v}) WHERE id({v}) = $id DETACH DELETE {v}"),
            match_clause: default_match(),
            detach: true,
        },
    ];

    for setup in SETUPS {
        let compiler = setup.compiler();
        let user = setup.user("someeyedee");
        let variable = compiler.config().variable.clone();

        for case in &cases {
            let expected = (case.expected)(&variable);

            let fragment = compiler
                .delete_node_with_match(&*user, case.detach, &case.match_clause)
                .unwrap();
            assert_eq!(fragment.query, expected, "delete_node_with_match: {}", case.name);

            if case.detach {
                let fragment = compiler
                    .detach_delete_node_with_match(&*user, &case.match_clause)
                    .unwrap();
                assert_eq!(fragment.query, expected, "detach_delete_node_with_match: {}", case.name);
                assert!(fragment.query.contains("DETACH DELETE"));
            }

            if case.detach && case.match_clause == default_match() {
                let fragment = compiler.detach_delete_node(&*user).unwrap();
                assert_eq!(fragment.query, expected, "detach_delete_node: {}", case.name);
            }

            if !case.detach && case.match_clause == default_match() {
                let fragment = compiler.delete_node(&*user, false).unwrap();
                assert_eq!(fragment.query, expected, "delete_node: {}", case.name);
            }
        }
    }
}

#[test]
fn test_match_node_with_and_without_return() {
    for setup in SETUPS {
        let compiler = setup.compiler();
        let user = setup.user("u-1");
        let v = compiler.config().variable.clone();

        let fragment = compiler.match_node(&*user, &user_label(), true).unwrap();
        assert_eq!(
            fragment.query,
            format!("MATCH ({v}:user) WHERE id({v}) = $id RETURN {v}")
        );
        assert_eq!(fragment.params["id"], json!("u-1"));

        let by_email = MatchClause::new().with("+v+.email", "email");
        let fragment = compiler
            .match_node_with(&*user, &Label::Entity, &by_email, false)
            .unwrap();
        let entity = &fragment.entity_name;
        assert_eq!(
            fragment.query,
            format!("MATCH ({v}:{entity}) WHERE {v}.email = $email")
        );
        assert_eq!(fragment.match_predicate, format!("{v}.email = $email"));
    }
}

#[test]
fn test_node_with_properties_uses_entity_name() {
    let compiler = FragmentCompiler::new(CompilerConfig::default()).unwrap();
    let fragment = compiler
        .node_with_properties(&json_user("x"), &Label::Entity)
        .unwrap();
    assert_eq!(
        fragment.query,
        "(flava:JsonUser {id: $id, name: $name, email: $email})"
    );
    assert_eq!(fragment.entity_name, "JsonUser");
}

#[test]
fn test_untagged_and_hidden_fields_are_skipped() {
    let compiler = FragmentCompiler::new(CompilerConfig::default()).unwrap();
    let fragment = compiler
        .create_node(&json_user("x"), &user_label(), false, &[])
        .unwrap();
    assert!(!fragment.create_literal.contains("password"));
    assert!(!fragment.params.contains_key("login_count"));
    assert!(!fragment.params.contains_key("password"));
    assert_eq!(fragment.params.len(), 3);
}

#[test]
fn test_excluded_id_still_bound_for_match() {
    let compiler = FragmentCompiler::new(CompilerConfig::default()).unwrap();
    let user = json_user("x");

    let create = compiler
        .create_node(&user, &user_label(), false, &["id"])
        .unwrap();
    assert!(!create.params.contains_key("id"));

    let update = compiler
        .update_node(&user, &user_label(), false, &["id"])
        .unwrap();
    assert!(!update.set_list.contains(".id ="));
    assert_eq!(update.params["id"], json!("x"));
}

#[test]
fn test_param_prefix_applies_to_node_statements() {
    let config = CompilerConfig::builder().param_prefix("p_").build().unwrap();
    let compiler = FragmentCompiler::new(config).unwrap();
    let fragment = compiler
        .update_node(&json_user("x"), &user_label(), false, &["name", "email"])
        .unwrap();
    assert_eq!(
        fragment.query,
        "MERGE (flava:user) WHERE id(flava) = $p_id SET flava.id = $p_id"
    );
    let keys: Vec<_> = fragment.params.keys().cloned().collect();
    assert_eq!(keys, vec!["p_id"]);
}

#[test]
fn test_repeated_calls_are_byte_identical() {
    let compiler = FragmentCompiler::new(CompilerConfig::default()).unwrap();
    let user = json_user("x");
    let first = compiler.update_node(&user, &user_label(), true, &[]).unwrap();
    for _ in 0..50 {
        let next = compiler.update_node(&user, &user_label(), true, &[]).unwrap();
        assert_eq!(next.create_literal, first.create_literal);
        assert_eq!(next.set_list, first.set_list);
        assert_eq!(next.query, first.query);
    }
}

#[test]
fn test_unsupported_record_kind() {
    let compiler = FragmentCompiler::new(CompilerConfig::default()).unwrap();
    let record = JsonRecord::new("User", json!(["not", "a", "struct"]));
    let err = compiler.match_node(&record, &user_label(), true).unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedEntityKind { .. }));
}

#[test]
fn test_compiler_shared_across_threads() {
    let compiler = std::sync::Arc::new(FragmentCompiler::new(CompilerConfig::default()).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let compiler = compiler.clone();
            std::thread::spawn(move || {
                let user = json_user(&format!("user-{}", i));
                compiler
                    .create_node(&user, &user_label(), true, &[])
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let fragment = handle.join().unwrap();
        assert_eq!(fragment.params["id"], json!(format!("user-{}", i)));
        assert_eq!(
            fragment.query,
            "CREATE (flava:user {id: $id, name: $name, email: $email}) RETURN flava"
        );
    }
}
