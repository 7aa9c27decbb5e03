use super::db_types::{Otp, OtpKind};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Outcome of a consuming verification attempt.
///
/// A wrong code and an already-used code both surface as `NotFound` so the
/// caller can never tell them apart.
#[derive(Clone, Debug)]
pub enum OtpVerification {
    Consumed(Otp),
    Expired,
    NotFound,
}

impl TryFrom<&Row<'_>> for Otp {
    type Error = rusqlite::Error;

    // select otp_id, creation_time, otp_kind, owner_email, code, expires_at, used order only
    fn try_from(row: &Row) -> Result<Otp, rusqlite::Error> {
        Ok(Otp {
            otp_id: row.get(0)?,
            creation_time: row.get(1)?,
            otp_kind: row
                .get::<_, i64>(2)?
                .try_into()
                .map_err(|x| rusqlite::Error::IntegralValueOutOfRange(2, x))?,
            owner_email: row.get(3)?,
            code: row.get(4)?,
            expires_at: row.get(5)?,
            used: row.get(6)?,
        })
    }
}

const COLUMNS: &str = "otp_id, creation_time, otp_kind, owner_email, code, expires_at, used";

/// Persists a fresh code. Does not invalidate siblings; callers supersede
/// with [`mark_all_used_by_owner`] before issuing a replacement.
pub fn add(
    con: &Connection,
    otp_kind: OtpKind,
    owner_email: String,
    code: String,
    creation_time: i64,
    expires_at: i64,
) -> Result<Otp, rusqlite::Error> {
    let sql = "INSERT INTO otp_t(creation_time, otp_kind, owner_email, code, expires_at, used)
               VALUES (?, ?, ?, ?, ?, 0)";
    con.execute(
        sql,
        params![
            creation_time,
            otp_kind as i64,
            owner_email,
            code,
            expires_at
        ],
    )?;

    Ok(Otp {
        otp_id: con.last_insert_rowid(),
        creation_time,
        otp_kind,
        owner_email,
        code,
        expires_at,
        used: false,
    })
}

// most recently created unused code matching the submitted value
pub fn get_unused_by_owner_and_code(
    con: &Connection,
    otp_kind: OtpKind,
    owner_email: &str,
    code: &str,
) -> Result<Option<Otp>, rusqlite::Error> {
    let sql = format!(
        "SELECT {} FROM otp_t
         WHERE otp_kind=? AND owner_email=? AND code=? AND used=0
         ORDER BY otp_id DESC LIMIT 1",
        COLUMNS
    );
    con.query_row(&sql, params![otp_kind as i64, owner_email, code], |row| {
        row.try_into()
    })
    .optional()
}

/// Consuming verification. The `used=0` guard on the update is the
/// compare-and-swap that keeps a code single-use under concurrent attempts:
/// whichever caller flips the flag first wins, the loser sees `NotFound`.
pub fn verify(
    con: &Connection,
    otp_kind: OtpKind,
    owner_email: &str,
    code: &str,
    now: i64,
) -> Result<OtpVerification, rusqlite::Error> {
    let otp = match get_unused_by_owner_and_code(con, otp_kind, owner_email, code)? {
        Some(otp) => otp,
        None => return Ok(OtpVerification::NotFound),
    };

    if now >= otp.expires_at {
        return Ok(OtpVerification::Expired);
    }

    let updated = con.execute(
        "UPDATE otp_t SET used=1 WHERE otp_id=? AND used=0",
        params![otp.otp_id],
    )?;

    if updated == 0 {
        return Ok(OtpVerification::NotFound);
    }

    Ok(OtpVerification::Consumed(Otp { used: true, ..otp }))
}

// supersession: renders every outstanding code for the owner unverifiable
pub fn mark_all_used_by_owner(
    con: &Connection,
    otp_kind: OtpKind,
    owner_email: &str,
) -> Result<usize, rusqlite::Error> {
    con.execute(
        "UPDATE otp_t SET used=1 WHERE otp_kind=? AND owner_email=? AND used=0",
        params![otp_kind as i64, owner_email],
    )
}

pub fn delete_by_owner(
    con: &Connection,
    otp_kind: OtpKind,
    owner_email: &str,
) -> Result<usize, rusqlite::Error> {
    con.execute(
        "DELETE FROM otp_t WHERE otp_kind=? AND owner_email=?",
        params![otp_kind as i64, owner_email],
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

    fn issue(con: &Connection, code: &str, expires_at: i64) -> Otp {
        add(
            con,
            OtpKind::Registration,
            "a@x.com".to_owned(),
            code.to_owned(),
            1000,
            expires_at,
        )
        .unwrap()
    }

    #[test]
    fn code_is_single_use() {
        let con = test_con();
        issue(&con, "1234", 10_000);

        match verify(&con, OtpKind::Registration, "a@x.com", "1234", 5000).unwrap() {
            OtpVerification::Consumed(otp) => {
                assert!(otp.used);
                assert_eq!(otp.otp_kind, OtpKind::Registration);
                assert_eq!(otp.owner_email, "a@x.com");
                assert_eq!(otp.code, "1234");
                assert_eq!(otp.creation_time, 1000);
            }
            other => panic!("expected consumed, got {:?}", other),
        }

        let second = verify(&con, OtpKind::Registration, "a@x.com", "1234", 5000).unwrap();
        assert!(matches!(second, OtpVerification::NotFound));
    }

    #[test]
    fn expired_code_reports_expired_without_consuming() {
        let con = test_con();
        issue(&con, "1234", 10_000);

        let late = verify(&con, OtpKind::Registration, "a@x.com", "1234", 10_000).unwrap();
        assert!(matches!(late, OtpVerification::Expired));

        // the row is untouched: still the latest unused match
        let still_there = get_unused_by_owner_and_code(&con, OtpKind::Registration, "a@x.com", "1234")
            .unwrap()
            .unwrap();
        assert!(!still_there.used);
    }

    #[test]
    fn wrong_code_is_not_found_even_when_expired_codes_exist() {
        let con = test_con();
        issue(&con, "1234", 1001);

        let wrong = verify(&con, OtpKind::Registration, "a@x.com", "9999", 5000).unwrap();
        assert!(matches!(wrong, OtpVerification::NotFound));
    }

    #[test]
    fn supersession_makes_old_codes_unverifiable() {
        let con = test_con();
        issue(&con, "1111", 10_000);

        mark_all_used_by_owner(&con, OtpKind::Registration, "a@x.com").unwrap();
        issue(&con, "2222", 10_000);

        let old = verify(&con, OtpKind::Registration, "a@x.com", "1111", 5000).unwrap();
        assert!(matches!(old, OtpVerification::NotFound));

        let fresh = verify(&con, OtpKind::Registration, "a@x.com", "2222", 5000).unwrap();
        assert!(matches!(fresh, OtpVerification::Consumed(_)));
    }

    #[test]
    fn duplicate_codes_consume_the_most_recent() {
        let con = test_con();
        let first = issue(&con, "1234", 10_000);
        let second = issue(&con, "1234", 10_000);
        assert!(second.otp_id > first.otp_id);

        match verify(&con, OtpKind::Registration, "a@x.com", "1234", 5000).unwrap() {
            OtpVerification::Consumed(otp) => assert_eq!(otp.otp_id, second.otp_id),
            other => panic!("expected consumed, got {:?}", other),
        }
    }

    #[test]
    fn kinds_are_isolated() {
        let con = test_con();
        issue(&con, "1234", 10_000);

        let cross = verify(&con, OtpKind::Reset, "a@x.com", "1234", 5000).unwrap();
        assert!(matches!(cross, OtpVerification::NotFound));
    }

    #[test]
    fn delete_by_owner_removes_everything() {
        let con = test_con();
        issue(&con, "1234", 10_000);
        issue(&con, "5678", 10_000);

        assert_eq!(
            delete_by_owner(&con, OtpKind::Registration, "a@x.com").unwrap(),
            2
        );
        let gone = verify(&con, OtpKind::Registration, "a@x.com", "1234", 5000).unwrap();
        assert!(matches!(gone, OtpVerification::NotFound));
    }
}
