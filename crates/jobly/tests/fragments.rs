use jobly::{
    ColumnAliases, FilterSet, JoblyError, SqlValue, sql_for_company_filter, sql_for_job_filter,
    sql_for_partial_filter, sql_for_partial_update,
};
use serde_json::{Value, json};

fn user_aliases() -> ColumnAliases {
    ColumnAliases::new()
        .alias("firstName", "first_name")
        .alias("lastName", "last_name")
        .alias("isAdmin", "is_admin")
}

// ==================== partial update ====================

#[test]
fn test_update_works() {
    let frag = sql_for_partial_update(
        &json!({"firstName": "Test", "lastName": "User", "email": "a@b.com"}),
        &user_aliases(),
    )
    .unwrap();

    assert_eq!(frag.clause(), r#""first_name"=$1, "last_name"=$2, "email"=$3"#);
    assert_eq!(
        frag.values(),
        &[
            SqlValue::from("Test"),
            SqlValue::from("User"),
            SqlValue::from("a@b.com")
        ]
    );
}

#[test]
fn test_update_fails_without_data() {
    for body in [json!({}), Value::Null] {
        let err = sql_for_partial_update(&body, &user_aliases()).unwrap_err();
        assert_eq!(err, JoblyError::BadRequest("No data".to_string()));
        assert_eq!(err.status(), 400);
    }
}

#[test]
fn test_update_has_one_contiguous_placeholder_per_key() {
    let mut body = serde_json::Map::new();
    for i in 0..25 {
        body.insert(format!("field{i}"), json!(i));
    }
    let frag = sql_for_partial_update(&Value::Object(body.clone()), &ColumnAliases::new()).unwrap();

    assert_eq!(frag.len(), 25);
    for (i, (part, (key, value))) in frag.parts().iter().zip(&body).enumerate() {
        assert_eq!(part, &format!("\"{key}\"=${}", i + 1));
        assert_eq!(frag.values()[i], SqlValue::from(value));
    }
}

// ==================== company filters ====================

#[test]
fn test_company_filter_name_like() {
    let frag = sql_for_company_filter(&json!({"nameLike": "c"})).unwrap();
    assert_eq!(frag.clause(), "name ILIKE $1");
    assert_eq!(frag.values(), &[SqlValue::from("%c%")]);
}

#[test]
fn test_company_filter_all_fields() {
    let frag =
        sql_for_company_filter(&json!({"minEmployees": 5, "maxEmployees": 500, "nameLike": "c"}))
            .unwrap();
    assert_eq!(
        frag.clause(),
        "num_employees>=$1 AND num_employees<=$2 AND name ILIKE $3"
    );
    assert_eq!(
        frag.values(),
        &[SqlValue::Int(5), SqlValue::Int(500), SqlValue::from("%c%")]
    );
}

#[test]
fn test_company_filter_requires_a_filter() {
    let err = sql_for_company_filter(&json!({})).unwrap_err();
    assert_eq!(
        err,
        JoblyError::bad_request("Must use at least one filter: minEmployees, maxEmployees, nameLike")
    );
}

#[test]
fn test_company_filter_rejects_unknown_keys() {
    let err = sql_for_company_filter(&json!({"random": "x"})).unwrap_err();
    assert_eq!(
        err,
        JoblyError::bad_request(
            "Filter does not match allowed methods: minEmployees, maxEmployees, nameLike"
        )
    );
}

#[test]
fn test_generic_filter_matches_company_output() {
    let body = json!({"nameLike": "net", "maxEmployees": "20"});
    assert_eq!(
        sql_for_partial_filter(&body).unwrap(),
        sql_for_company_filter(&body).unwrap()
    );
}

// ==================== job filters ====================

#[test]
fn test_job_filter_equity_binds_nothing() {
    let frag = sql_for_job_filter(&json!({"hasEquity": "true"})).unwrap();
    assert_eq!(frag.clause(), "equity > 0");
    assert!(frag.values().is_empty());
}

#[test]
fn test_job_filter_placeholders_count_value_bearing_predicates() {
    let frag = sql_for_job_filter(&json!({"title": "j", "minSalary": 5000, "hasEquity": "true"}))
        .unwrap();
    assert_eq!(frag.clause(), "title ILIKE $1 AND salary>=$2 AND equity > 0");
    assert_eq!(frag.values(), &[SqlValue::from("%j%"), SqlValue::Int(5000)]);
}

#[test]
fn test_job_filter_query_string_values() {
    let filters = jobly::query_to_map([("title", ""), ("minSalary", "5000"), ("hasEquity", "true")]);
    let frag = FilterSet::job().build(&filters).unwrap();
    assert_eq!(frag.clause(), "salary>=$1 AND equity > 0");
    assert_eq!(frag.values(), &[SqlValue::Int(5000)]);
}

#[test]
fn test_job_filter_requires_a_filter() {
    let err = sql_for_job_filter(&json!({})).unwrap_err();
    assert_eq!(
        err.message(),
        "Must use at least one filter: title, minSalary, hasEquity"
    );
    assert_eq!(err.status(), 400);
}

#[test]
fn test_job_filter_rejects_unknown_keys() {
    let err = sql_for_job_filter(&json!({"nameLike": "x"})).unwrap_err();
    assert_eq!(
        err.message(),
        "Filter does not match allowed methods: title, minSalary, hasEquity"
    );
}

// ==================== purity ====================

#[test]
fn test_repeated_calls_are_identical() {
    let make = || json!({"title": "j", "minSalary": "5000", "hasEquity": "false"});

    let first_input = make();
    let first = sql_for_job_filter(&first_input).unwrap();
    let second = sql_for_job_filter(&make()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first_input, make());

    let make = || json!({"nameLike": "c", "minEmployees": 5});
    let first_input = make();
    assert_eq!(
        sql_for_company_filter(&first_input).unwrap(),
        sql_for_company_filter(&make()).unwrap()
    );
    assert_eq!(first_input, make());

    let make = || json!({"firstName": "A", "isAdmin": true});
    let first_input = make();
    assert_eq!(
        sql_for_partial_update(&first_input, &user_aliases()).unwrap(),
        sql_for_partial_update(&make(), &user_aliases()).unwrap()
    );
    assert_eq!(first_input, make());
}
