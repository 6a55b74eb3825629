//! Client and project operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Client, Project};

fn map_client_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    let created_at_str: String = row.get(2)?;
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime(&created_at_str),
    })
}

fn map_project_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let created_at_str: String = row.get(3)?;
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        client_id: row.get(2)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    pub fn add_client(&self, name: &str) -> Result<Client> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("client name must not be empty".into()));
        }
        let conn = self.conn()?;
        conn.execute("INSERT INTO clients (name) VALUES (?)", params![name])?;
        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_client(id)
    }

    pub fn get_client(&self, id: i64) -> Result<Client> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, created_at FROM clients WHERE id = ?",
            params![id],
            map_client_row,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Client not found: {}", id)))
    }

    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM clients ORDER BY name")?;
        let rows = stmt.query_map([], map_client_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn add_project(&self, name: &str, client_id: i64) -> Result<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("project name must not be empty".into()));
        }
        // Clearer error than the foreign key failure
        let _ = self.get_client(client_id)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO projects (name, client_id) VALUES (?, ?)",
            params![name, client_id],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_project(id)
    }

    pub fn get_project(&self, id: i64) -> Result<Project> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, client_id, created_at FROM projects WHERE id = ?",
            params![id],
            map_project_row,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Project not found: {}", id)))
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id, name, client_id, created_at FROM projects ORDER BY name")?;
        let rows = stmt.query_map([], map_project_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
