use std::fs;

use flatsql::{Config, Session};
use tempfile::TempDir;

fn open_session() -> (TempDir, Session) {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new(Config::new().data_dir(dir.path()).column_width(6)).unwrap();
    (dir, session)
}

fn run(session: &mut Session, line: &str) -> Vec<String> {
    session.execute_line(line).output
}

fn row_file(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("T.tbl")).unwrap()
}

#[test]
fn test_create_insert_select() {
    let (dir, mut session) = open_session();

    assert_eq!(
        run(&mut session, "create table T(a int, b varchar(10), primary key(a));"),
        vec!["Table <T> created successfully."]
    );
    assert_eq!(
        run(&mut session, r#"insert into T values(1,"x");"#),
        vec!["Tuple inserted successfully."]
    );
    assert_eq!(run(&mut session, "select * from T;"), vec!["1     x     "]);
    assert_eq!(row_file(&dir), "<1,x>\n");
}

#[test]
fn test_duplicate_primary_key_keeps_row_count() {
    let (dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    run(&mut session, r#"insert into T values(1,"x");"#);

    assert_eq!(
        run(&mut session, r#"insert into T values(1,"y");"#),
        vec!["Error: PK already exists: 1"]
    );
    assert_eq!(row_file(&dir), "<1,x>\n");
}

#[test]
fn test_update_then_select() {
    let (_dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    run(&mut session, r#"insert into T values(1,"x");"#);

    assert_eq!(
        run(&mut session, r#"update T set b="z" where a=1;"#),
        vec!["1 rows affected."]
    );
    assert_eq!(run(&mut session, "select a, b from T;"), vec!["1     z     "]);
}

#[test]
fn test_delete_nothing_matches() {
    let (dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    run(&mut session, r#"insert into T values(1,"x");"#);

    assert_eq!(
        run(&mut session, "delete from T where a!=1;"),
        vec!["0 rows affected."]
    );
    assert_eq!(row_file(&dir), "<1,x>\n");
}

#[test]
fn test_drop_then_select() {
    let (dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    run(&mut session, r#"insert into T values(1,"x");"#);

    assert_eq!(run(&mut session, "drop table T;"), vec!["<T> dropped successfully."]);
    assert_eq!(
        run(&mut session, "select * from T;"),
        vec!["Error: table <T> doesn't exist"]
    );
    assert!(!dir.path().join("T.tbl").exists());
}

#[test]
fn test_create_drop_restores_catalog() {
    let (dir, mut session) = open_session();
    run(&mut session, "create table A(x int, primary key(x));");
    let before = fs::read_to_string(dir.path().join("schema.txt")).unwrap();

    run(
        &mut session,
        "create table T(a int, d date, m decimal(7,2), b varchar(5) check b!=\"\", primary key(a));",
    );
    run(&mut session, "drop table T;");

    let after = fs::read_to_string(dir.path().join("schema.txt")).unwrap();
    assert_eq!(before, after);
    assert_eq!(run(&mut session, "help tables;"), vec!["Tables:", "  A"]);
}

#[test]
fn test_type_checks_reject_bad_values() {
    let (dir, mut session) = open_session();
    run(
        &mut session,
        "create table T(a int, d date, m decimal(7,2), primary key(a));",
    );

    let rejected = [
        "insert into T values(1.5,01-01-2000,1);",
        "insert into T values(1,2000-01-01,1);",
        "insert into T values(1,01-01-2000,1.2.3);",
        "insert into T values(1,01-01-2000);",
    ];
    for line in rejected {
        let output = run(&mut session, line);
        assert_eq!(output.len(), 1, "{}", line);
        assert!(output[0].starts_with("Error: "), "{}", line);
    }
    assert_eq!(row_file(&dir), "");

    assert_eq!(
        run(&mut session, "insert into T values(-3,24-02-2001,500.25);"),
        vec!["Tuple inserted successfully."]
    );
    assert_eq!(row_file(&dir), "<-3,24-02-2001,500.25>\n");
}

#[test]
fn test_primary_key_update_needs_where() {
    let (dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    run(&mut session, r#"insert into T values(1,"x");"#);
    run(&mut session, r#"insert into T values(2,"y");"#);

    assert_eq!(
        run(&mut session, "update T set a=5;"),
        vec!["Error: refusing to update primary key without a where clause"]
    );
    assert_eq!(row_file(&dir), "<1,x>\n<2,y>\n");
}

#[test]
fn test_primary_key_update_with_where_skips_uniqueness() {
    // A key moved by update is not checked against the other rows.
    let (dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    run(&mut session, r#"insert into T values(1,"x");"#);
    run(&mut session, r#"insert into T values(2,"y");"#);

    assert_eq!(
        run(&mut session, "update T set a=1 where a=2;"),
        vec!["1 rows affected."]
    );
    assert_eq!(row_file(&dir), "<1,x>\n<1,y>\n");
}

#[test]
fn test_update_leaves_other_rows_untouched() {
    let (dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    for line in [
        r#"insert into T values(1,"x");"#,
        r#"insert into T values(2,"y");"#,
        r#"insert into T values(3,"z");"#,
    ] {
        run(&mut session, line);
    }

    assert_eq!(
        run(&mut session, r#"update T set b="q" where a=2;"#),
        vec!["1 rows affected."]
    );
    assert_eq!(row_file(&dir), "<1,x>\n<2,q>\n<3,z>\n");
}

#[test]
fn test_delete_reports_removed_count() {
    let (_dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    for a in 1..=5 {
        run(&mut session, &format!(r#"insert into T values({},"r");"#, a));
    }

    assert_eq!(
        run(&mut session, "delete from T where a>3;"),
        vec!["2 rows affected."]
    );
    assert_eq!(run(&mut session, "select a from T;").len(), 3);
    assert_eq!(run(&mut session, "delete from T;"), vec!["3 rows affected."]);
    assert_eq!(run(&mut session, "select * from T;"), vec!["(no rows)"]);
}

#[test]
fn test_where_combines_left_to_right() {
    // `a=1 or a=2 and b="y"` is `(a=1 or a=2) and b="y"`, so the a=1 row is
    // not selected even though its first comparison holds.
    let (_dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    run(&mut session, r#"insert into T values(1,"x");"#);
    run(&mut session, r#"insert into T values(2,"y");"#);

    assert_eq!(
        run(&mut session, r#"select a from T where a=1 or a=2 and b="y";"#),
        vec!["2     "]
    );
}

#[test]
fn test_describe_prints_catalog_block() {
    let (_dir, mut session) = open_session();
    run(
        &mut session,
        "create table T(a int, b varchar(10) check b!=\"\", primary key(a));",
    );

    let output = run(&mut session, "describe T;");
    assert_eq!(output[0], "*T*");
    assert_eq!(output[1], "<<");
    assert_eq!(output[2], "pk: a");
    assert_eq!(output[3], "a int");
    assert!(output[4].starts_with("b varchar 10 check"));
    assert_eq!(output.last().map(String::as_str), Some(">>"));
}

#[test]
fn test_state_survives_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new().data_dir(dir.path());
    {
        let mut session = Session::new(config.clone()).unwrap();
        run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
        run(&mut session, r#"insert into T values(7,"kept");"#);
    }

    let mut session = Session::new(config.column_width(5)).unwrap();
    assert_eq!(run(&mut session, "select b from T where a=7;"), vec!["kept "]);
}

#[test]
fn test_large_integer_keys_stay_distinct() {
    let (_dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    run(&mut session, r#"insert into T values(9007199254740992,"lo");"#);
    run(&mut session, r#"insert into T values(9007199254740993,"hi");"#);

    assert_eq!(
        run(&mut session, "select b from T where a=9007199254740993;"),
        vec!["hi    "]
    );
    assert_eq!(
        run(&mut session, "select b from T where a>9007199254740992;"),
        vec!["hi    "]
    );
}

#[test]
fn test_invalid_utf8_row_does_not_block_table() {
    let (dir, mut session) = open_session();
    run(&mut session, "create table T(a int, b varchar(10), primary key(a));");
    run(&mut session, r#"insert into T values(1,"x");"#);
    let path = dir.path().join("T.tbl");
    let mut contents = fs::read(&path).unwrap();
    contents.extend_from_slice(b"<2,\xff\xfe>\n");
    fs::write(&path, &contents).unwrap();

    assert_eq!(run(&mut session, "select * from T;"), vec!["1     x     "]);
    assert_eq!(
        run(&mut session, r#"insert into T values(3,"z");"#),
        vec!["Tuple inserted successfully."]
    );
    assert_eq!(
        run(&mut session, "delete from T where a=1;"),
        vec!["1 rows affected."]
    );
    assert_eq!(fs::read(&path).unwrap(), b"<2,\xff\xfe>\n<3,z>\n".to_vec());

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["T.tbl", "schema.txt"]);
}
