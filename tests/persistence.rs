use student_roster::{BootstrapMode, StudentName, StudentRepository};

#[test]
fn open_creates_nested_data_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("nested").join("dir").join("students.sqlite");

    let repo = StudentRepository::open(&db_path, BootstrapMode::SeedOnCreate).unwrap();
    assert!(db_path.exists());
    assert_eq!(repo.list_all().unwrap().len(), 5);
}

#[test]
fn seed_on_create_keeps_user_data_across_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("students.sqlite");

    let created = {
        let repo = StudentRepository::open(&db_path, BootstrapMode::SeedOnCreate).unwrap();
        repo.delete_by_id(1).unwrap();
        repo.create(&StudentName::new("Орлов", "Олег", "Олегович"))
            .unwrap()
    };

    let repo = StudentRepository::open(&db_path, BootstrapMode::SeedOnCreate).unwrap();
    let students = repo.list_all().unwrap();
    assert_eq!(students.len(), 5);
    assert!(students.iter().all(|s| s.id != 1));
    assert_eq!(students.last(), Some(&created));
}

#[test]
fn reset_on_launch_restores_the_seed_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("students.sqlite");

    {
        let repo = StudentRepository::open(&db_path, BootstrapMode::SeedOnCreate).unwrap();
        repo.create(&StudentName::new("A", "B", "C")).unwrap();
        repo.update_by_id(2, &StudentName::new("X", "Y", "Z")).unwrap();
    }

    let repo = StudentRepository::open(&db_path, BootstrapMode::ResetOnLaunch).unwrap();
    let students = repo.list_all().unwrap();
    let ids: Vec<i64> = students.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(students[1].name(), StudentName::new("Петров", "Петр", "Петрович"));
}

#[test]
fn emptied_table_stays_empty_on_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("students.sqlite");

    {
        let repo = StudentRepository::open(&db_path, BootstrapMode::SeedOnCreate).unwrap();
        for student in repo.list_all().unwrap() {
            assert!(repo.delete_by_id(student.id).unwrap());
        }
    }

    let repo = StudentRepository::open(&db_path, BootstrapMode::SeedOnCreate).unwrap();
    assert!(repo.list_all().unwrap().is_empty());
    assert_eq!(repo.replace_last_with_fixed_identity().unwrap(), None);
}
