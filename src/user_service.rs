use super::db_types::User;
use rusqlite::{params, Connection, OptionalExtension, Row};

impl TryFrom<&Row<'_>> for User {
    type Error = rusqlite::Error;

    // select user_id, creation_time, name, email, password_hash, is_active order only
    fn try_from(row: &Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            user_id: row.get(0)?,
            creation_time: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            password_hash: row.get(4)?,
            is_active: row.get(5)?,
        })
    }
}

const COLUMNS: &str = "user_id, creation_time, name, email, password_hash, is_active";

pub fn add(
    con: &Connection,
    name: String,
    email: String,
    password_hash: String,
    creation_time: i64,
) -> Result<User, rusqlite::Error> {
    let sql = "INSERT INTO user_t(creation_time, name, email, password_hash, is_active)
               VALUES (?, ?, ?, ?, ?)";
    // accounts only exist once email ownership is proven, so they start active
    con.execute(
        sql,
        params![creation_time, name, email, password_hash, true],
    )?;

    Ok(User {
        user_id: con.last_insert_rowid(),
        creation_time,
        name,
        email,
        password_hash,
        is_active: true,
    })
}

pub fn get_by_user_id(con: &Connection, user_id: i64) -> Result<Option<User>, rusqlite::Error> {
    let sql = format!("SELECT {} FROM user_t WHERE user_id=?", COLUMNS);
    con.query_row(&sql, params![user_id], |row| row.try_into())
        .optional()
}

pub fn get_by_email(con: &Connection, email: &str) -> Result<Option<User>, rusqlite::Error> {
    let sql = format!("SELECT {} FROM user_t WHERE email=?", COLUMNS);
    con.query_row(&sql, params![email], |row| row.try_into())
        .optional()
}

pub fn exists_by_email(con: &Connection, email: &str) -> Result<bool, rusqlite::Error> {
    let count: i64 = con.query_row(
        "SELECT count(*) FROM user_t WHERE email=?",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count != 0)
}

pub fn update_password_hash(
    con: &Connection,
    user_id: i64,
    password_hash: &str,
) -> Result<usize, rusqlite::Error> {
    con.execute(
        "UPDATE user_t SET password_hash=? WHERE user_id=?",
        params![password_hash, user_id],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_init;

    fn test_con() -> Connection {
        let mut con = Connection::open_in_memory().unwrap();
        db_init::initialize(&mut con).unwrap();
        con
    }

    #[test]
    fn add_then_lookup() {
        let con = test_con();

        let user = add(
            &con,
            "A".to_owned(),
            "a@x.com".to_owned(),
            "hash".to_owned(),
            1000,
        )
        .unwrap();
        assert!(user.is_active);

        let by_id = get_by_user_id(&con, user.user_id).unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        assert!(exists_by_email(&con, "a@x.com").unwrap());
        assert!(!exists_by_email(&con, "b@x.com").unwrap());
    }

    #[test]
    fn email_unique_constraint() {
        let con = test_con();

        add(
            &con,
            "A".to_owned(),
            "a@x.com".to_owned(),
            "hash".to_owned(),
            1000,
        )
        .unwrap();
        let dup = add(
            &con,
            "B".to_owned(),
            "a@x.com".to_owned(),
            "hash2".to_owned(),
            2000,
        );
        assert!(dup.is_err());
    }

    #[test]
    fn password_hash_update() {
        let con = test_con();

        let user = add(
            &con,
            "A".to_owned(),
            "a@x.com".to_owned(),
            "old".to_owned(),
            1000,
        )
        .unwrap();

        assert_eq!(update_password_hash(&con, user.user_id, "new").unwrap(), 1);
        let reread = get_by_user_id(&con, user.user_id).unwrap().unwrap();
        assert_eq!(reread.password_hash, "new");
    }
}
