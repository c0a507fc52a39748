//! Filter building and evaluation against the `Alpha` fixture.

mod common;

use common::{at, betas, kappa, mapping, Alpha, Omega};
use lookout::{
    build_filters, build_filters_with_rejections, matches_all, resolve, CompareOperator,
    FieldPath, Predicate, QueryError, QueryRequest,
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn run<'a>(items: &'a [Alpha], predicates: &[Predicate<Alpha>]) -> Vec<&'a Alpha> {
    items
        .iter()
        .filter(|item| matches_all(predicates, item))
        .collect()
}

fn rendered(predicates: &[Predicate<Alpha>]) -> Vec<String> {
    predicates.iter().map(ToString::to_string).collect()
}

#[test]
fn empty_request_builds_nothing() {
    let predicates = build_filters::<Alpha>(&QueryRequest::new(), None);
    assert!(predicates.is_empty());

    let items = vec![Alpha::with_beta(1), Alpha::with_beta(2)];
    assert_eq!(betas(&run(&items, &predicates)), [1, 2]);
}

#[test]
fn global_search_checks_every_string_field() {
    let request = QueryRequest::new().search("Darkwing Duck");
    let predicates = build_filters::<Alpha>(&request, None);

    assert_eq!(predicates.len(), 1);
    assert_eq!(
        predicates[0].to_string(),
        concat!(
            r#"(p.gamma != null && p.gamma.contains("Darkwing Duck")) || "#,
            r#"(p.delta != null && p.delta.contains("Darkwing Duck")) || "#,
            r#"(p.epsilon != null && p.epsilon.contains("Darkwing Duck")) || "#,
            r#"(p.phi != null && p.phi.contains("Darkwing Duck"))"#,
        )
    );

    let items = vec![
        Alpha {
            beta: 1,
            gamma: Some("DD".into()),
            ..Alpha::default()
        },
        Alpha {
            beta: 2,
            phi: Some("I am Darkwing Duck!".into()),
            ..Alpha::default()
        },
        Alpha {
            beta: 3,
            delta: Some("darkwing duck".into()),
            ..Alpha::default()
        },
    ];
    assert_eq!(betas(&run(&items, &predicates)), [2]);
}

#[test]
fn search_comes_before_descriptors() {
    let request = QueryRequest::new()
        .filter("lambda", CompareOperator::GreaterThan, "5")
        .search("Duck");
    let predicates = build_filters::<Alpha>(&request, None);

    assert_eq!(predicates.len(), 2);
    assert!(matches!(predicates[0], Predicate::Or(_)));
    assert_eq!(predicates[1].to_string(), "p.lambda > 5");
}

#[test]
fn string_equal_and_contains() {
    let items = vec![
        Alpha {
            beta: 1,
            gamma: Some("DD".into()),
            delta: Some("QuackFu better than KungFu".into()),
            ..Alpha::default()
        },
        Alpha {
            beta: 2,
            gamma: Some("Darkwing Duck".into()),
            delta: Some("QuackFu better than KungFu".into()),
            ..Alpha::default()
        },
        Alpha {
            beta: 3,
            gamma: Some("Darkwing Duck".into()),
            delta: Some("KungFu".into()),
            ..Alpha::default()
        },
    ];
    let request = QueryRequest::new()
        .filter("gamma", CompareOperator::Equal, "Darkwing Duck")
        .filter("delta", CompareOperator::Contains, "QuackFu");

    let predicates = build_filters::<Alpha>(&request, None);
    assert_eq!(
        rendered(&predicates),
        [
            r#"p.gamma == "Darkwing Duck""#,
            r#"p.delta != null && p.delta.contains("QuackFu")"#,
        ]
    );
    assert_eq!(betas(&run(&items, &predicates)), [2]);
}

#[test]
fn integer_comparisons() {
    let rows = [(1, 4, 10), (2, 6, 11), (3, 6, 8), (4, 6, 13)];
    let items: Vec<Alpha> = rows
        .iter()
        .map(|&(beta, lambda, nullable)| Alpha {
            beta,
            lambda,
            lambda_nullable: Some(nullable),
            ..Alpha::default()
        })
        .collect();
    let request = QueryRequest::new()
        .filter("lambda", CompareOperator::GreaterThan, "5")
        .filter("lambdaNullable", CompareOperator::LessThan, "12");

    let predicates = build_filters::<Alpha>(&request, None);
    // `lambdaNullable` matches no field name, even ignoring case.
    assert_eq!(rendered(&predicates), ["p.lambda > 5"]);

    let request = QueryRequest::new()
        .filter("lambda", CompareOperator::GreaterThan, "5")
        .filter("LAMBDA_NULLABLE", CompareOperator::LessThan, "12");
    let predicates = build_filters::<Alpha>(&request, None);
    assert_eq!(
        rendered(&predicates),
        ["p.lambda > 5", "p.lambda_nullable < 12"]
    );
    assert_eq!(betas(&run(&items, &predicates)), [2, 3]);
}

#[test]
fn decimal_comparisons() {
    let rows = [
        (1, Decimal::new(4, 0), Decimal::new(10, 0)),
        (2, Decimal::new(426, 2), Decimal::new(1049, 2)),
        (3, Decimal::new(625, 2), Decimal::new(81, 1)),
        (4, Decimal::new(5, 0), Decimal::new(11, 0)),
    ];
    let items: Vec<Alpha> = rows
        .iter()
        .map(|&(beta, my, nullable)| Alpha {
            beta,
            my,
            my_nullable_one: Some(nullable),
            ..Alpha::default()
        })
        .collect();
    let request = QueryRequest::new()
        .filter(Alpha::MY, CompareOperator::GreaterThan, "4.25")
        .filter(Alpha::MY_NULLABLE_ONE, CompareOperator::LessThan, "10.5");

    let predicates = build_filters::<Alpha>(&request, None);
    assert_eq!(
        rendered(&predicates),
        ["p.my > 4.25", "p.my_nullable_one < 10.5"]
    );
    assert_eq!(betas(&run(&items, &predicates)), [2, 3]);
}

#[test]
fn float_comparisons() {
    let rows = [(1, 4.0, 10.0), (2, 4.25, 10.5), (3, 6.0, 8.0), (4, 5.0, 11.0)];
    let items: Vec<Alpha> = rows
        .iter()
        .map(|&(beta, ny, nullable)| Alpha {
            beta,
            ny,
            ny_nullable: Some(nullable),
            ..Alpha::default()
        })
        .collect();
    let request = QueryRequest::new()
        .filter(Alpha::NY, CompareOperator::GreaterThanOrEqual, "4.25")
        .filter(Alpha::NY_NULLABLE, CompareOperator::LessThanOrEqual, "10.5");

    let predicates = build_filters::<Alpha>(&request, None);
    assert_eq!(betas(&run(&items, &predicates)), [2, 3]);
}

#[test]
fn double_comparisons() {
    let rows = [(1, 0.0, 0.0), (2, 4.25, 4.25), (3, 4.25, 10.5)];
    let items: Vec<Alpha> = rows
        .iter()
        .map(|&(beta, xi, nullable)| Alpha {
            beta,
            xi,
            xi_nullable: Some(nullable),
            ..Alpha::default()
        })
        .collect();
    let request = QueryRequest::new()
        .filter(Alpha::XI, CompareOperator::Equal, "4.25")
        .filter(Alpha::XI_NULLABLE, CompareOperator::NotEqual, "10.5");

    let predicates = build_filters::<Alpha>(&request, None);
    assert_eq!(
        rendered(&predicates),
        ["p.xi == 4.25", "p.xi_nullable != 10.5"]
    );
    assert_eq!(betas(&run(&items, &predicates)), [2]);
}

#[test]
fn nan_differs_from_every_term() {
    let items = vec![
        Alpha {
            beta: 1,
            xi: f64::NAN,
            xi_nullable: Some(f64::NAN),
            ..Alpha::default()
        },
        Alpha {
            beta: 2,
            xi: 10.5,
            xi_nullable: Some(10.5),
            ..Alpha::default()
        },
    ];

    let not_equal = QueryRequest::new()
        .filter(Alpha::XI, CompareOperator::NotEqual, "10.5")
        .filter(Alpha::XI_NULLABLE, CompareOperator::NotEqual, "10.5");
    assert_eq!(betas(&run(&items, &build_filters::<Alpha>(&not_equal, None))), [1]);

    for op in [
        CompareOperator::Equal,
        CompareOperator::GreaterThan,
        CompareOperator::GreaterThanOrEqual,
        CompareOperator::LessThan,
        CompareOperator::LessThanOrEqual,
    ] {
        let request = QueryRequest::new().filter(Alpha::XI, op, "10.5");
        let matched = run(&items[..1], &build_filters::<Alpha>(&request, None));
        assert!(matched.is_empty(), "NaN matched {op}");
    }
}

#[test]
fn date_time_comparisons() {
    let psi = at(12, 30, 15);
    let omega = at(9, 45, 30);
    let next_day = common::day().succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap();
    let rows = [
        (1, None, omega),
        (2, Some(omega), psi),
        (3, Some(psi), psi),
        (4, Some(next_day), psi),
    ];
    let items: Vec<Alpha> = rows
        .iter()
        .map(|&(beta, psi, omega_date_time)| Alpha {
            beta,
            psi,
            omega_date_time,
            ..Alpha::default()
        })
        .collect();
    let request = QueryRequest::new()
        .filter(Alpha::PSI, CompareOperator::LessThanOrEqual, "2024-01-29T12:30:15Z")
        .filter(
            Alpha::OMEGA_DATE_TIME,
            CompareOperator::NotEqual,
            "2024-01-29T09:45:30Z",
        );

    let predicates = build_filters::<Alpha>(&request, None);
    assert_eq!(
        rendered(&predicates),
        [
            "p.psi <= 2024-01-29T12:30:15.000Z",
            "p.omega_date_time != 2024-01-29T09:45:30.000Z",
        ]
    );
    assert_eq!(betas(&run(&items, &predicates)), [2, 3]);
}

#[test]
fn wrong_data_types_are_dropped() {
    let request = QueryRequest::new()
        .filter("gamma", CompareOperator::GreaterThan, "")
        .filter("lambda", CompareOperator::GreaterThan, "Darkwing Duck")
        .filter("my", CompareOperator::GreaterThanOrEqual, "Darkwing Duck")
        .filter("ny", CompareOperator::GreaterThanOrEqual, "Darkwing Duck")
        .filter("xi", CompareOperator::Equal, "Darkwing Duck")
        .filter("psi", CompareOperator::Equal, "Darkwing Duck")
        .filter("stigma_one", CompareOperator::Equal, "")
        .filter("chi", CompareOperator::Equal, "Darkwing Duck");

    let (predicates, rejections) = build_filters_with_rejections::<Alpha>(&request, None);
    assert!(predicates.is_empty());
    assert_eq!(rejections.len(), 8);

    assert_eq!(rejections[0].property, "gamma");
    assert_eq!(
        rejections[0].reason,
        QueryError::InvalidOperatorForType {
            op: CompareOperator::GreaterThan,
            target: "string".into()
        }
    );
    assert!(rejections[1..]
        .iter()
        .all(|r| matches!(r.reason, QueryError::InvalidTerm { .. })));
}

#[test]
fn unknown_property_is_dropped() {
    let request = QueryRequest::new()
        .filter("omicron", CompareOperator::Equal, "1")
        .filter("note", CompareOperator::Equal, "skipped fields are not queryable");

    let (predicates, rejections) = build_filters_with_rejections::<Alpha>(&request, None);
    assert!(predicates.is_empty());
    assert_eq!(
        rejections[0].reason,
        QueryError::UnknownField {
            field: "omicron".into()
        }
    );
    assert_eq!(rejections[1].path, None);
}

#[test]
fn nested_object_is_not_filterable() {
    let request = QueryRequest::new()
        .filter("kappa", CompareOperator::Equal, "x")
        .filter("Kappa", CompareOperator::Contains, "x");

    let (predicates, rejections) = build_filters_with_rejections::<Alpha>(&request, None);
    assert!(predicates.is_empty());
    assert_eq!(rejections.len(), 2);
    assert_eq!(
        rejections[0].reason,
        QueryError::InvalidOperatorForType {
            op: CompareOperator::Equal,
            target: "object".into()
        }
    );
    assert_eq!(rejections[1].path.as_deref(), Some("kappa"));
}

#[test]
fn boolean_comparisons() {
    let rows = [
        (1, true, None),
        (2, true, Some(false)),
        (3, true, Some(true)),
        (4, false, Some(false)),
    ];
    let items: Vec<Alpha> = rows
        .iter()
        .map(|&(beta, stigma_one, stigma_two)| Alpha {
            beta,
            stigma_one,
            stigma_two,
            ..Alpha::default()
        })
        .collect();
    let request = QueryRequest::new()
        .filter(Alpha::STIGMA_ONE, CompareOperator::Equal, "1")
        .filter(Alpha::STIGMA_TWO, CompareOperator::Equal, "false");

    let predicates = build_filters::<Alpha>(&request, None);
    assert_eq!(
        rendered(&predicates),
        ["p.stigma_one == true", "p.stigma_two == false"]
    );
    assert_eq!(betas(&run(&items, &predicates)), [2]);
}

#[test]
fn nullable_boolean_not_equal_keeps_null() {
    let items: Vec<Alpha> = [(1, None), (2, Some(false)), (3, Some(true))]
        .iter()
        .map(|&(beta, stigma_two)| Alpha {
            beta,
            stigma_two,
            ..Alpha::default()
        })
        .collect();
    let request = QueryRequest::new()
        .filter(Alpha::STIGMA_TWO, CompareOperator::NotEqual, "true")
        .filter(Alpha::STIGMA_TWO, CompareOperator::NotEqual, "false");

    let predicates = build_filters::<Alpha>(&request, None);
    assert_eq!(betas(&run(&items, &predicates)), [1]);
}

#[test]
fn uuid_equality() {
    let wanted = Uuid::parse_str("87428c4c-26c5-4208-861f-6875606e356f").unwrap();
    let other = Uuid::parse_str("3f93f67c-1345-48c4-bb71-547378e71c6c").unwrap();
    let rows = [
        (1, None),
        (2, Some(Uuid::nil())),
        (3, Some(wanted)),
        (4, Some(other)),
    ];
    let items: Vec<Alpha> = rows
        .iter()
        .map(|&(beta, chi)| Alpha {
            beta,
            chi,
            ..Alpha::default()
        })
        .collect();
    let request =
        QueryRequest::new().filter(Alpha::CHI, CompareOperator::Equal, wanted.to_string());

    let predicates = build_filters::<Alpha>(&request, None);
    assert_eq!(
        rendered(&predicates),
        ["p.chi == 87428c4c-26c5-4208-861f-6875606e356f"]
    );
    assert_eq!(betas(&run(&items, &predicates)), [3]);
}

fn with_kappa(beta: i32, psi: Option<&str>, chi: Option<&str>) -> Alpha {
    Alpha {
        beta,
        kappa: Some(Omega {
            psi: psi.map(String::from),
            chi: chi.map(String::from),
            sigma: None,
        }),
        ..Alpha::default()
    }
}

#[test]
fn mapping_redirects_to_nested_field() {
    let items = vec![
        with_kappa(1, Some(""), None),
        with_kappa(2, None, None),
        with_kappa(3, Some("Darkwing Duck"), None),
        with_kappa(4, Some("QuackFu"), None),
        Alpha::with_beta(5),
    ];
    // The mapping shadows the direct `chi` field.
    let mappings = mapping("Chi", vec![kappa("psi")]);
    let request = QueryRequest::new()
        .filter("Chi", CompareOperator::Equal, "Darkwing Duck")
        .filter("Chi", CompareOperator::Contains, "QuackFu");

    let predicates = build_filters(&request, Some(&mappings));
    assert_eq!(
        rendered(&predicates),
        [
            r#"p.kappa.psi == "Darkwing Duck""#,
            r#"p.kappa.psi != null && p.kappa.psi.contains("QuackFu")"#,
        ]
    );
    assert_eq!(betas(&predicates[0].filter(&items)), [3]);
    assert_eq!(betas(&predicates[1].filter(&items)), [4]);
}

#[test]
fn mapping_to_several_paths_is_or_combined() {
    let items = vec![
        with_kappa(1, Some(""), Some("")),
        with_kappa(2, None, None),
        with_kappa(3, Some("Darkwing Duck"), Some("")),
        with_kappa(4, Some(""), Some("Darkwing Duck")),
    ];
    let mappings = mapping("Chi", vec![kappa("psi"), kappa("chi"), kappa("sigma")]);
    let request = QueryRequest::new().filter("Chi", CompareOperator::Equal, "Darkwing Duck");

    let (predicates, rejections) = build_filters_with_rejections(&request, Some(&mappings));
    assert_eq!(
        rendered(&predicates),
        [r#"p.kappa.psi == "Darkwing Duck" || p.kappa.chi == "Darkwing Duck""#]
    );
    assert_eq!(betas(&run(&items, &predicates)), [3, 4]);

    // The sequence path cannot take Equal and is dropped on its own.
    assert_eq!(rejections.len(), 1);
    assert_eq!(rejections[0].path.as_deref(), Some("kappa.sigma"));
}

fn with_sigma(beta: i32, sigma: Option<Vec<i32>>) -> Alpha {
    Alpha {
        beta,
        sigma,
        ..Alpha::default()
    }
}

fn sigma_items() -> Vec<Alpha> {
    vec![
        with_sigma(1, None),
        with_sigma(2, Some(vec![])),
        with_sigma(3, Some(vec![7, 5, 3])),
        with_sigma(4, Some(vec![1, 2, 3])),
    ]
}

#[test]
fn sequence_contains_through_mapping() {
    let items = sigma_items();
    let sigma: FieldPath<Alpha> = resolve::<Alpha>("sigma", None).remove(0);
    let mappings = mapping("Chi", vec![sigma]);
    let request = QueryRequest::new().filter("Chi", CompareOperator::Contains, "7");

    let predicates = build_filters(&request, Some(&mappings));
    assert_eq!(rendered(&predicates), ["p.sigma != null && p.sigma.contains(7)"]);
    assert_eq!(betas(&run(&items, &predicates)), [3]);
}

#[test]
fn sequence_contains_direct() {
    let items = sigma_items();
    let request = QueryRequest::new().filter(Alpha::SIGMA, CompareOperator::Contains, "7");

    let predicates = build_filters::<Alpha>(&request, None);
    assert_eq!(rendered(&predicates), ["p.sigma != null && p.sigma.contains(7)"]);
    assert_eq!(betas(&run(&items, &predicates)), [3]);

    // Only Contains applies to sequences
    let request = QueryRequest::new().filter(Alpha::SIGMA, CompareOperator::Equal, "7");
    assert!(build_filters::<Alpha>(&request, None).is_empty());
}

#[test]
fn building_twice_gives_equal_predicates() {
    let mappings = mapping("Chi", vec![kappa("psi"), kappa("chi")]);
    let request = QueryRequest::new()
        .search("Duck")
        .filter("Chi", CompareOperator::Contains, "Quack")
        .filter("lambda", CompareOperator::LessThanOrEqual, "3");

    let first = build_filters(&request, Some(&mappings));
    let second = build_filters(&request, Some(&mappings));
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}
