//! Database Module
//!
//! SQLite 영속성 게이트웨이. 파라미터 바인딩된 문장 실행만 담당하고
//! 비즈니스 로직은 갖지 않습니다.

mod schema;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, Params, Row, Transaction};

use crate::error::AppError;

/// 문장 실행 결과
#[derive(Debug, Clone, Copy)]
pub struct ExecuteResult {
    pub inserted_id: i64,
    pub rows_affected: usize,
}

/// 데이터베이스 상태 (actix 앱 상태로 관리)
pub struct DbState(pub Mutex<Database>);

/// 데이터베이스 래퍼
pub struct Database {
    conn: Connection,
}

impl Database {
    /// 새 데이터베이스 연결 생성 (연결 실패는 기동 실패)
    pub fn new(path: &Path) -> Result<Self, AppError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// 테스트용 인메모리 데이터베이스
    pub fn in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// 데이터베이스 스키마 초기화 (멱등)
    pub fn initialize(&self) -> Result<(), AppError> {
        self.conn.execute_batch(schema::CREATE_SCHEMA)?;
        Ok(())
    }

    /// INSERT/UPDATE/DELETE 실행
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<ExecuteResult, AppError> {
        let rows_affected = self.conn.execute(sql, params)?;
        Ok(ExecuteResult {
            inserted_id: self.conn.last_insert_rowid(),
            rows_affected,
        })
    }

    /// 단일 행 조회 (없으면 None)
    pub fn fetch_one<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>, AppError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let row = self.conn.query_row(sql, params, map).optional()?;
        Ok(row)
    }

    /// 다중 행 조회
    pub fn fetch_all<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, AppError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let iter = stmt.query_map(params, map)?;
        let mut out = Vec::new();
        for row in iter {
            out.push(row?);
        }
        Ok(out)
    }

    /// 여러 문장을 하나의 트랜잭션으로 실행 (프로젝트 캐스케이드 삭제 등)
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, AppError>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        let db = Database::in_memory().unwrap();
        db.initialize().unwrap();
        db.initialize().unwrap();
    }

    #[test]
    fn test_execute_reports_inserted_id_and_affected_rows() {
        let db = Database::in_memory().unwrap();
        db.initialize().unwrap();

        let result = db
            .execute(
                "INSERT INTO projects (name, created_at, updated_at) VALUES (?1, ?2, ?3)",
                ("테스트", 0i64, 0i64),
            )
            .unwrap();
        assert_eq!(result.inserted_id, 1);
        assert_eq!(result.rows_affected, 1);

        let result = db
            .execute("DELETE FROM projects WHERE id = ?1", [999i64])
            .unwrap();
        assert_eq!(result.rows_affected, 0);
    }

    #[test]
    fn test_fetch_one_absent_row_is_none() {
        let db = Database::in_memory().unwrap();
        db.initialize().unwrap();

        let row = db
            .fetch_one("SELECT name FROM projects WHERE id = ?1", [1i64], |r| {
                r.get::<_, String>(0)
            })
            .unwrap();
        assert!(row.is_none());
    }

    #[test]
    fn test_on_disk_database_file_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");
        let db = Database::new(&path).unwrap();
        db.initialize().unwrap();
        assert!(path.exists());
    }
}
