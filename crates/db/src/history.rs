use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use xwatch_core::FollowerSnapshot;

use crate::Db;
use crate::error::Result;
use crate::helpers::{format_day, format_ts, parse_day};

impl Db {
    /// Appends a snapshot unless one exists for the same day, then trims the
    /// history to the newest `cap` entries. Returns whether it was added.
    pub fn append_follower_snapshot(
        &mut self,
        snapshot: &FollowerSnapshot,
        cap: usize,
    ) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let inserted = tx.execute(
            r#"
            INSERT OR IGNORE INTO follower_snapshot (day, followers, following, posts, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                format_day(snapshot.date),
                snapshot.followers as i64,
                snapshot.following as i64,
                snapshot.posts as i64,
                format_ts(&Utc::now()),
            ],
        )?;
        if inserted > 0 {
            tx.execute(
                r#"
                DELETE FROM follower_snapshot
                WHERE day NOT IN (
                  SELECT day FROM follower_snapshot ORDER BY day DESC LIMIT ?1
                )
                "#,
                params![cap as i64],
            )?;
        }
        tx.commit()?;
        Ok(inserted > 0)
    }

    pub fn latest_follower_snapshot(&self) -> Result<Option<FollowerSnapshot>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT day, followers, following, posts
                FROM follower_snapshot
                ORDER BY day DESC
                LIMIT 1
                "#,
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;
        row.map(|(day, followers, following, posts)| {
            Ok(FollowerSnapshot {
                date: parse_day(&day)?,
                followers: followers.max(0) as u64,
                following: following.max(0) as u64,
                posts: posts.max(0) as u64,
            })
        })
        .transpose()
    }

    /// Oldest first.
    pub fn list_follower_snapshots(&self) -> Result<Vec<FollowerSnapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT day, followers, following, posts FROM follower_snapshot ORDER BY day ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(day, followers, following, posts)| {
                Ok(FollowerSnapshot {
                    date: parse_day(&day)?,
                    followers: followers.max(0) as u64,
                    following: following.max(0) as u64,
                    posts: posts.max(0) as u64,
                })
            })
            .collect()
    }
}
