use super::db_types::PendingRegistration;
use rusqlite::{params, Connection, OptionalExtension};

pub fn add(
    con: &Connection,
    email: String,
    name: String,
    password_hash: String,
    creation_time: i64,
) -> Result<PendingRegistration, rusqlite::Error> {
    let sql = "INSERT INTO pending_registration_t VALUES (?, ?, ?, ?)";
    con.execute(sql, params![email, creation_time, name, password_hash])?;

    Ok(PendingRegistration {
        email,
        creation_time,
        name,
        password_hash,
    })
}

pub fn get_by_email(
    con: &Connection,
    email: &str,
) -> Result<Option<PendingRegistration>, rusqlite::Error> {
    let sql = "SELECT email, creation_time, name, password_hash
               FROM pending_registration_t WHERE email=?";
    con.query_row(sql, params![email], |row| {
        Ok(PendingRegistration {
            email: row.get(0)?,
            creation_time: row.get(1)?,
            name: row.get(2)?,
            password_hash: row.get(3)?,
        })
    })
    .optional()
}

pub fn delete_by_email(con: &Connection, email: &str) -> Result<usize, rusqlite::Error> {
    con.execute(
        "DELETE FROM pending_registration_t WHERE email=?",
        params![email],
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
    fn add_then_get_then_delete() {
        let con = test_con();

        add(
            &con,
            "a@x.com".to_owned(),
            "A".to_owned(),
            "hash".to_owned(),
            1000,
        )
        .unwrap();

        let found = get_by_email(&con, "a@x.com").unwrap().unwrap();
        assert_eq!(found.name, "A");
        assert_eq!(found.creation_time, 1000);

        assert_eq!(delete_by_email(&con, "a@x.com").unwrap(), 1);
        assert!(get_by_email(&con, "a@x.com").unwrap().is_none());
    }

    #[test]
    fn email_is_primary_key() {
        let con = test_con();

        add(
            &con,
            "a@x.com".to_owned(),
            "A".to_owned(),
            "hash".to_owned(),
            1000,
        )
        .unwrap();

        // a second staging for the same email must go through delete first
        let dup = add(
            &con,
            "a@x.com".to_owned(),
            "B".to_owned(),
            "hash2".to_owned(),
            2000,
        );
        assert!(dup.is_err());
    }
}
