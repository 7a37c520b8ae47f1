use catalog_core::db::open_db_in_memory;
use catalog_core::search::institution_search::matches_institution;
use catalog_core::{
    search_institutions, Institution, InstitutionRepository, InstitutionType, NewInstitution,
    RepoError, SqliteInstitutionRepository,
};

fn seed(repo: &SqliteInstitutionRepository<'_>, name: &str, city: Option<&str>) -> i64 {
    repo.create_institution(&NewInstitution {
        name: name.to_string(),
        kind: Some(InstitutionType::Ecole),
        city: city.map(str::to_string),
        country: Some("France".to_string()),
    })
    .unwrap()
    .id
}

#[test]
fn search_caps_at_ten_matches_in_storage_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteInstitutionRepository::new(&conn);

    let mut matching_ids = Vec::new();
    for index in 0..12 {
        matching_ids.push(seed(&repo, &format!("École {index}"), Some("Springfield")));
        seed(&repo, &format!("Autre {index}"), Some("Shelbyville"));
    }

    let hits = search_institutions(&repo, Some("springFIELD")).unwrap();
    assert_eq!(hits.len(), 10);
    let ids: Vec<i64> = hits.iter().map(|hit| hit.id).collect();
    assert_eq!(ids, matching_ids[..10].to_vec());
    for hit in &hits {
        assert_eq!(hit.city.as_deref(), Some("Springfield"));
        assert_eq!(hit.kind.as_deref(), Some("ECOLE"));
        assert_eq!(hit.country.as_deref(), Some("France"));
    }
}

#[test]
fn search_matches_name_and_tolerates_missing_city() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteInstitutionRepository::new(&conn);
    let by_name = seed(&repo, "Springfield Elementary", None);
    seed(&repo, "Capital City High", None);

    let hits = search_institutions(&repo, Some("elementary")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, by_name);
    assert_eq!(hits[0].city, None);
}

#[test]
fn streaming_scan_agrees_with_in_memory_filter() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteInstitutionRepository::new(&conn);
    for index in 0..5 {
        seed(&repo, &format!("Institut Ä{index}"), Some("Fès"));
    }

    let needle = "ä".to_string();
    let streamed = repo
        .find_matching(
            &|institution: &Institution| matches_institution(institution, &needle),
            3,
        )
        .unwrap();
    let filtered: Vec<_> = repo
        .find_all()
        .unwrap()
        .into_iter()
        .filter(|institution| institution.name.to_lowercase().contains(&needle))
        .take(3)
        .collect();
    assert_eq!(streamed, filtered);
    assert_eq!(streamed.len(), 3);
}

#[test]
fn unknown_stored_type_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO institution (name, type) VALUES ('Legacy', 'ACADEMIE');",
        [],
    )
    .unwrap();
    let repo = SqliteInstitutionRepository::new(&conn);

    let err = search_institutions(&repo, Some("legacy")).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("ACADEMIE")));
}
