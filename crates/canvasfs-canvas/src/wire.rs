//! JSON shapes returned by the Canvas REST API.
//!
//! Only the fields the filesystem needs are decoded; everything else in the
//! payload is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use canvasfs_kernel::{File, Folder, ResourceScope};

/// `GET /api/v1/users/self`
#[derive(Debug, Clone, Deserialize)]
pub struct UserJson {
    pub id: u64,
    pub name: String,
}

impl UserJson {
    pub fn into_scope(self) -> ResourceScope {
        ResourceScope::personal(self.id, self.name)
    }
}

/// `GET /api/v1/users/self/courses`
///
/// Courses the account can no longer access come back as `{id,
/// access_restricted_by_date}` with no name.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseJson {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

impl CourseJson {
    pub fn into_scope(self) -> Option<ResourceScope> {
        let name = self.name?;
        Some(ResourceScope::course(self.id, name))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FolderJson {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub files_count: u64,
    #[serde(default)]
    pub folders_count: u64,
}

impl From<FolderJson> for Folder {
    fn from(json: FolderJson) -> Self {
        Folder {
            id: json.id,
            name: json.name,
            created_at: json.created_at,
            updated_at: json.updated_at,
            files_count: json.files_count,
            folders_count: json.folders_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileJson {
    pub id: u64,
    pub display_name: String,
    #[serde(default)]
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Null for files that were never modified after upload.
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    /// Empty when the account may see the file but not download it.
    #[serde(default)]
    pub url: Option<String>,
}

impl From<FileJson> for File {
    fn from(json: FileJson) -> Self {
        File {
            id: json.id,
            display_name: json.display_name,
            size: json.size,
            created_at: json.created_at,
            updated_at: json.updated_at,
            modified_at: json.modified_at.unwrap_or(json.updated_at),
            url: json.url.filter(|u| !u.is_empty()),
        }
    }
}

/// Body of `POST /api/v1/folders/{id}/folders`.
#[derive(Debug, Serialize)]
pub struct CreateFolderJson<'a> {
    pub name: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOLDER: &str = r#"{
        "id": 2937,
        "name": "Lecture Slides",
        "full_name": "course files/Lecture Slides",
        "context_id": 101,
        "context_type": "Course",
        "parent_folder_id": 2930,
        "created_at": "2024-08-19T10:12:45Z",
        "updated_at": "2024-09-02T08:00:01Z",
        "lock_at": null,
        "unlock_at": null,
        "position": 3,
        "locked": false,
        "folders_url": "https://canvas.example/api/v1/folders/2937/folders",
        "files_url": "https://canvas.example/api/v1/folders/2937/files",
        "files_count": 12,
        "folders_count": 2,
        "hidden": null,
        "locked_for_user": false,
        "hidden_for_user": false,
        "for_submissions": false,
        "can_upload": false
    }"#;

    const FILE: &str = r#"{
        "id": 88121,
        "uuid": "x1y2z3",
        "folder_id": 2937,
        "display_name": "week1.pdf",
        "filename": "week1.pdf",
        "content-type": "application/pdf",
        "url": "https://canvas.example/files/88121/download?download_frd=1&verifier=abc",
        "size": 1024,
        "created_at": "2024-08-20T09:00:00Z",
        "updated_at": "2024-08-21T09:00:00Z",
        "unlock_at": null,
        "locked": false,
        "hidden": false,
        "lock_at": null,
        "hidden_for_user": false,
        "thumbnail_url": null,
        "modified_at": "2024-08-20T09:30:00Z",
        "mime_class": "pdf",
        "media_entry_id": null,
        "locked_for_user": false
    }"#;

    #[test]
    fn test_decode_folder() {
        let json: FolderJson = serde_json::from_str(FOLDER).unwrap();
        let folder = Folder::from(json);
        assert_eq!(folder.id, 2937);
        assert_eq!(folder.name, "Lecture Slides");
        assert_eq!(folder.files_count + folder.folders_count, 14);
        assert!(folder.updated_at > folder.created_at);
    }

    #[test]
    fn test_decode_file() {
        let json: FileJson = serde_json::from_str(FILE).unwrap();
        let file = File::from(json);
        assert_eq!(file.display_name, "week1.pdf");
        assert_eq!(file.size, 1024);
        assert!(file.modified_at < file.updated_at);
        assert!(file.url.unwrap().contains("/files/88121/download"));
    }

    #[test]
    fn test_file_without_modified_or_url() {
        let json: FileJson = serde_json::from_str(
            r#"{"id": 1, "display_name": "a.txt", "size": 3,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-02T00:00:00Z",
                "modified_at": null, "url": ""}"#,
        )
        .unwrap();
        let file = File::from(json);
        assert_eq!(file.modified_at, file.updated_at);
        assert!(file.url.is_none());
    }

    #[test]
    fn test_restricted_course_skipped() {
        let courses: Vec<CourseJson> = serde_json::from_str(
            r#"[{"id": 101, "name": "CS101", "course_code": "CS101"},
                {"id": 55, "access_restricted_by_date": true}]"#,
        )
        .unwrap();
        let scopes: Vec<_> = courses.into_iter().filter_map(CourseJson::into_scope).collect();
        assert_eq!(scopes, vec![ResourceScope::course(101, "CS101")]);
    }

    #[test]
    fn test_decode_user() {
        let user: UserJson = serde_json::from_str(
            r#"{"id": 7, "name": "Ada Lovelace", "sortable_name": "Lovelace, Ada"}"#,
        )
        .unwrap();
        assert_eq!(user.into_scope(), ResourceScope::personal(7, "Ada Lovelace"));
    }
}
