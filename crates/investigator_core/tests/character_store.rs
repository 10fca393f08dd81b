use investigator_core::db::open_db_in_memory;
use investigator_core::{
    AttributeSet, CharacterRepository, CustomSkillEntry, FixedFaces, Info, NewCharacter, NewItem,
    RepoError, SkillCategory, SkillEntry, SqliteCharacterRepository, StatKind,
};
use rusqlite::Connection;

fn otto() -> NewCharacter {
    NewCharacter {
        info: Info {
            name: "Otto Hightower".to_string(),
            profession: "Hand of the King".to_string(),
            age: "65".to_string(),
            gender: "männlich".to_string(),
            residence: "King's Landing".to_string(),
            birthplace: "Oldtown".to_string(),
        },
        attributes: AttributeSet {
            st: 40,
            ge: 50,
            ma: 50,
            ko: 50,
            er: 70,
            bi: 60,
            gr: 60,
            intelligence: 80,
            bw: 6,
        },
        skills: Vec::new(),
        custom_skills: Vec::new(),
    }
}

fn sixes() -> FixedFaces {
    FixedFaces::new([6, 6, 6])
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn insert_and_get_end_to_end() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();

    let id = repo.insert_character(&otto(), 7, &mut sixes()).unwrap();
    assert!(id > 0);

    let loaded = repo.get_character(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.info.name, "Otto Hightower");
    assert_eq!(loaded.attributes, otto().attributes);
    assert_eq!(loaded.stats.tp.max, 11);
    assert_eq!(loaded.stats.tp.current, 11);
    assert_eq!(loaded.stats.sta.max, 50);
    assert_eq!(loaded.stats.mp.max, 10);
    assert_eq!(loaded.stats.luck.max, 90);
    assert!(loaded.skills.is_empty());
    assert!(loaded.custom_skills.is_empty());
    assert!(loaded.items.is_empty());
    assert!(loaded.notes.is_empty());
}

#[test]
fn insert_writes_skills_and_registers_custom_skills() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();

    let mut draft = otto();
    draft.skills = vec![
        SkillEntry::new("Horchen", 60),
        SkillEntry::new("Finanzkraft", 40),
    ];
    draft.custom_skills = vec![CustomSkillEntry::new(
        SkillCategory::NativeLanguage,
        "Westerosi",
        50,
    )];
    let id = repo.insert_character(&draft, 7, &mut sixes()).unwrap();

    let loaded = repo.get_character(id).unwrap().unwrap();
    assert_eq!(loaded.skills, draft.skills);
    assert_eq!(loaded.custom_skills, draft.custom_skills);
    drop(repo);

    let default_value: i64 = conn
        .query_row(
            "SELECT default_value FROM custom_skills WHERE name = 'Westerosi' AND category = 'Muttersprache';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(default_value, 50);
}

#[test]
fn failed_insert_leaves_no_rows_behind() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();

    let mut draft = otto();
    draft.skills = vec![
        SkillEntry::new("Horchen", 60),
        SkillEntry::new("Horchen", 50),
    ];
    draft.custom_skills = vec![CustomSkillEntry::new(
        SkillCategory::Craft,
        "Schmieden",
        40,
    )];

    let err = repo.insert_character(&draft, 7, &mut sixes()).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(repo.get_character(1).unwrap().is_none());
    drop(repo);

    for table in [
        "characters",
        "character_info",
        "character_attributes",
        "character_stats",
        "character_skills",
        "custom_skills",
        "character_custom_skills",
    ] {
        assert_eq!(count_rows(&conn, table), 0, "rows left in {table}");
    }
}

#[test]
fn random_source_failure_stores_zero_stats() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();

    let id = repo
        .insert_character(&otto(), 7, &mut FixedFaces::new([6]))
        .unwrap();

    let stats = repo.load_stats(id).unwrap();
    for kind in StatKind::ALL {
        assert_eq!(stats.pool(kind).max, 0);
        assert_eq!(stats.pool(kind).current, 0);
    }
}

#[test]
fn get_missing_character_returns_none() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();

    assert!(repo.get_character(99).unwrap().is_none());
}

#[test]
fn character_without_mandatory_rows_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO characters (created_by) VALUES (1);", [])
        .unwrap();
    let id = conn.last_insert_rowid();
    let repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();

    assert!(repo.get_character(id).unwrap().is_none());
    let err = repo.list_all_characters().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn list_owned_and_all_are_ordered_by_id() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();

    let first = repo.insert_character(&otto(), 1, &mut sixes()).unwrap();
    let second = repo.insert_character(&otto(), 2, &mut sixes()).unwrap();
    let third = repo.insert_character(&otto(), 1, &mut sixes()).unwrap();

    let owned: Vec<i64> = repo
        .list_characters_owned_by(1)
        .unwrap()
        .into_iter()
        .map(|character| character.id)
        .collect();
    assert_eq!(owned, vec![first, third]);

    let all: Vec<i64> = repo
        .list_all_characters()
        .unwrap()
        .into_iter()
        .map(|character| character.id)
        .collect();
    assert_eq!(all, vec![first, second, third]);

    assert!(repo.list_characters_owned_by(3).unwrap().is_empty());
    assert_eq!(repo.character_owner(second).unwrap(), 2);
}

#[test]
fn delete_cascades_to_owned_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();

    let mut draft = otto();
    draft.skills = vec![SkillEntry::new("Horchen", 60)];
    draft.custom_skills = vec![CustomSkillEntry::new(
        SkillCategory::NativeLanguage,
        "Westerosi",
        50,
    )];
    let id = repo.insert_character(&draft, 7, &mut sixes()).unwrap();
    repo.add_item(
        id,
        &NewItem {
            name: "Siegelring".to_string(),
            description: "Hand of the King".to_string(),
            count: 1,
        },
    )
    .unwrap();
    repo.add_note(id, "Trust no one").unwrap();

    repo.delete_character(id).unwrap();
    assert!(repo.get_character(id).unwrap().is_none());
    assert!(matches!(
        repo.delete_character(id),
        Err(RepoError::CharacterNotFound(missing)) if missing == id
    ));
    drop(repo);

    for table in [
        "characters",
        "character_info",
        "character_attributes",
        "character_stats",
        "character_skills",
        "character_custom_skills",
        "items",
        "notes",
    ] {
        assert_eq!(count_rows(&conn, table), 0, "orphans left in {table}");
    }
    // the shared catalog outlives the character
    assert_eq!(count_rows(&conn, "custom_skills"), 1);
}

#[test]
fn item_count_edits_clamp_at_one() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();
    let id = repo.insert_character(&otto(), 7, &mut sixes()).unwrap();

    let item_id = repo
        .add_item(
            id,
            &NewItem {
                name: "Kerze".to_string(),
                description: "Bienenwachs".to_string(),
                count: 1,
            },
        )
        .unwrap();

    assert_eq!(repo.edit_item_count(id, item_id, 0).unwrap(), 1);
    assert_eq!(repo.edit_item_count(id, item_id, -5).unwrap(), 1);
    assert_eq!(repo.get_item(id, item_id).unwrap().count, 1);

    assert_eq!(repo.edit_item_count(id, item_id, 3).unwrap(), 3);
    let loaded = repo.get_character(id).unwrap().unwrap();
    assert_eq!(loaded.items.len(), 1);
    assert_eq!(loaded.items[0].id, item_id);
    assert_eq!(loaded.items[0].count, 3);
}

#[test]
fn item_operations_are_scoped_to_their_character() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();
    let owner = repo.insert_character(&otto(), 7, &mut sixes()).unwrap();
    let other = repo.insert_character(&otto(), 8, &mut sixes()).unwrap();

    let item_id = repo
        .add_item(
            owner,
            &NewItem {
                name: "Dolch".to_string(),
                description: "Valyrischer Stahl".to_string(),
                count: 1,
            },
        )
        .unwrap();

    assert!(matches!(
        repo.edit_item_count(other, item_id, 2),
        Err(RepoError::ItemNotFound { .. })
    ));
    assert!(matches!(
        repo.delete_item(other, item_id),
        Err(RepoError::ItemNotFound { .. })
    ));
    repo.delete_item(owner, item_id).unwrap();
    assert!(matches!(
        repo.get_item(owner, item_id),
        Err(RepoError::ItemNotFound { .. })
    ));
}

#[test]
fn sub_resources_require_existing_character() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();

    assert!(matches!(
        repo.add_note(5, "lost"),
        Err(RepoError::CharacterNotFound(5))
    ));
    assert!(matches!(
        repo.add_skill(5, "Horchen", 40),
        Err(RepoError::CharacterNotFound(5))
    ));
}

#[test]
fn notes_are_added_and_deleted_by_id() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();
    let id = repo.insert_character(&otto(), 7, &mut sixes()).unwrap();

    let first = repo.add_note(id, "Rhaenyra").unwrap();
    let second = repo.add_note(id, "Rhaenyra").unwrap();
    assert_ne!(first, second);

    repo.delete_note(id, first).unwrap();
    let loaded = repo.get_character(id).unwrap().unwrap();
    assert_eq!(loaded.notes.len(), 1);
    assert_eq!(loaded.notes[0].id, second);
    assert_eq!(loaded.notes[0].text, "Rhaenyra");

    assert!(matches!(
        repo.delete_note(id, first),
        Err(RepoError::NoteNotFound { .. })
    ));
}

#[test]
fn skills_are_added_once_and_edited() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();
    let id = repo.insert_character(&otto(), 7, &mut sixes()).unwrap();

    repo.add_skill(id, "Klettern", 40).unwrap();
    assert!(matches!(
        repo.add_skill(id, "Klettern", 50),
        Err(RepoError::AlreadyHasSkill { .. })
    ));

    repo.edit_skill(id, "Klettern", 70).unwrap();
    assert!(matches!(
        repo.edit_skill(id, "Schwimmen", 70),
        Err(RepoError::SkillNotFound { .. })
    ));

    let loaded = repo.get_character(id).unwrap().unwrap();
    assert_eq!(loaded.skills, vec![SkillEntry::new("Klettern", 70)]);
}

#[test]
fn available_skills_are_sorted_by_name() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();

    let skills = repo.list_available_skills().unwrap();
    let mut names: Vec<&str> = skills.iter().map(|skill| skill.name.as_str()).collect();
    let listed = names.clone();
    names.sort_unstable();
    assert_eq!(listed, names);
    assert_eq!(repo.base_skill_default("Charme").unwrap(), Some(15));
    assert_eq!(repo.base_skill_default("Drachenreiten").unwrap(), None);
}

#[test]
fn stat_writes_touch_only_current_value() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteCharacterRepository::try_new(&mut conn).unwrap();
    let id = repo.insert_character(&otto(), 7, &mut sixes()).unwrap();

    repo.write_stat_current(id, StatKind::Mp, 3).unwrap();
    let stats = repo.load_stats(id).unwrap();
    assert_eq!(stats.mp.current, 3);
    assert_eq!(stats.mp.max, 10);
    assert_eq!(stats.tp.current, 11);

    assert!(matches!(
        repo.write_stat_current(404, StatKind::Tp, 1),
        Err(RepoError::CharacterNotFound(404))
    ));
}
