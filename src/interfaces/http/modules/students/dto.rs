//! Student DTOs
//!
//! Wire names are Portuguese (`nome`, `curso`, `situacao`, ...), matching
//! the clients this service was written for.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{NewStudent, Student, StudentPatch, StudentStatus};
use crate::shared::types::pagination::PaginatedResult;
use crate::shared::validations::{validate_not_blank, RGA_FORMAT};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentDto {
    #[schema(example = "5b0d6f6e-3c4d-4b8a-9f0e-2a1b3c4d5e6f")]
    pub id: String,
    #[schema(example = "2019.1907.001-2")]
    pub rga: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "curso")]
    pub course: String,
    /// `"ativo"`, `"inativo"` or null
    #[serde(rename = "situacao")]
    #[schema(value_type = Option<String>, example = "ativo")]
    pub status: Option<StudentStatus>,
    /// RFC 3339
    #[serde(rename = "registrado_em")]
    pub registered_in: String,
}

impl From<Student> for StudentDto {
    fn from(s: Student) -> Self {
        Self {
            id: s.id,
            rga: s.rga,
            name: s.name,
            course: s.course,
            status: s.status,
            registered_in: s.registered_in.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentRequest {
    #[validate(regex(path = *RGA_FORMAT, message = "must match the format 0000.0000.000-0"))]
    #[schema(example = "2019.1907.001-2")]
    pub rga: String,
    #[serde(rename = "nome")]
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(rename = "curso")]
    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    pub course: String,
    #[serde(rename = "situacao", default)]
    #[schema(value_type = Option<String>, example = "ativo")]
    pub status: Option<StudentStatus>,
}

impl From<CreateStudentRequest> for NewStudent {
    fn from(r: CreateStudentRequest) -> Self {
        Self {
            name: r.name,
            rga: r.rga,
            course: r.course,
            status: r.status,
        }
    }
}

/// Partial update. Absent fields are left untouched; a field that is
/// present goes through the same checks as on create.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentRequest {
    #[serde(default)]
    #[validate(regex(path = *RGA_FORMAT, message = "must match the format 0000.0000.000-0"))]
    pub rga: Option<String>,
    #[serde(rename = "nome", default)]
    #[validate(length(max = 255), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[serde(rename = "curso", default)]
    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    pub course: Option<String>,
    #[serde(rename = "situacao", default)]
    #[schema(value_type = Option<String>, example = "inativo")]
    pub status: Option<StudentStatus>,
}

impl From<UpdateStudentRequest> for StudentPatch {
    fn from(r: UpdateStudentRequest) -> Self {
        Self {
            name: r.name,
            rga: r.rga,
            course: r.course,
            status: r.status,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListStudentsParams {
    /// Page number, starting at 1. Default: 1
    #[serde(rename = "pagina")]
    pub page: Option<i64>,
    /// Page size. Default and maximum come from `[pagination]` (10 / 100)
    #[serde(rename = "limite")]
    pub limit: Option<i64>,
    /// Case-insensitive substring of the student name. Empty lists all
    #[serde(rename = "nome")]
    pub name: Option<String>,
}

impl ListStudentsParams {
    /// The name filter, if one was given with any non-blank content.
    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAllStudentsParams {
    #[serde(rename = "nome")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    #[serde(rename = "pagina")]
    pub page: u64,
    #[serde(rename = "limite")]
    pub limit: u64,
    #[serde(rename = "paginas")]
    pub page_count: u64,
    #[serde(rename = "temProximaPagina")]
    pub has_next_page: bool,
    #[serde(rename = "temPaginaAnterior")]
    pub has_previous_page: bool,
}

/// One page of results plus its position in the whole listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationView<T> {
    #[serde(rename = "paginacao")]
    pub pagination: PageInfo,
    /// Total number of matching items across all pages
    #[serde(rename = "tamanho")]
    pub total: u64,
    #[serde(rename = "resultado")]
    pub items: Vec<T>,
}

impl<T> From<PaginatedResult<T>> for PaginationView<T> {
    fn from(r: PaginatedResult<T>) -> Self {
        Self {
            pagination: PageInfo {
                page: r.page,
                limit: r.limit,
                page_count: r.page_count,
                has_next_page: r.has_next_page,
                has_previous_page: r.has_previous_page,
            },
            total: r.total_item_count,
            items: r.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_reads_portuguese_fields() {
        let req: CreateStudentRequest = serde_json::from_str(
            r#"{"rga":"2019.1907.001-2","nome":"Ana","curso":"Fisica","situacao":"ativo"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        let new = NewStudent::from(req);
        assert_eq!(new.name, "Ana");
        assert_eq!(new.status, Some(StudentStatus::Active));
    }

    #[test]
    fn create_request_rejects_blank_and_malformed_fields() {
        let req: CreateStudentRequest =
            serde_json::from_str(r#"{"rga":"2019-1907","nome":"  ","curso":"Fisica"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(
            fields["rga"][0].message.as_deref(),
            Some("must match the format 0000.0000.000-0")
        );
    }

    #[test]
    fn update_request_checks_rga_only_when_present() {
        let bad: UpdateStudentRequest = serde_json::from_str(r#"{"rga":"2019.1907.001"}"#).unwrap();
        assert!(bad.validate().unwrap_err().field_errors().contains_key("rga"));

        let good: UpdateStudentRequest =
            serde_json::from_str(r#"{"rga":"2019.1907.001-2"}"#).unwrap();
        assert!(good.validate().is_ok());
    }

    #[test]
    fn create_request_enforces_length_limits() {
        let req = CreateStudentRequest {
            rga: "2019.1907.001-2".into(),
            name: "a".repeat(256),
            course: "c".repeat(101),
            status: None,
        };
        assert_eq!(req.validate().unwrap_err().field_errors().len(), 2);
    }

    #[test]
    fn update_request_distinguishes_empty_from_absent() {
        let absent: UpdateStudentRequest = serde_json::from_str(r#"{"curso":"Quimica"}"#).unwrap();
        assert!(absent.validate().is_ok());
        let patch = StudentPatch::from(absent);
        assert!(patch.name.is_none());
        assert_eq!(patch.course.as_deref(), Some("Quimica"));

        let empty: UpdateStudentRequest = serde_json::from_str(r#"{"nome":""}"#).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn unknown_status_is_a_parse_error() {
        let res: Result<UpdateStudentRequest, _> =
            serde_json::from_str(r#"{"situacao":"suspenso"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn pagination_view_uses_wire_names() {
        let window = crate::shared::types::pagination::PaginationPolicy::default()
            .resolve(Some(2), Some(1))
            .unwrap()
            .window(3);
        let view = PaginationView::from(PaginatedResult::new(vec![1], 3, window));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["tamanho"], 3);
        assert_eq!(json["paginacao"]["pagina"], 2);
        assert_eq!(json["paginacao"]["paginas"], 3);
        assert_eq!(json["paginacao"]["temProximaPagina"], true);
        assert_eq!(json["paginacao"]["temPaginaAnterior"], true);
        assert_eq!(json["resultado"], serde_json::json!([1]));
    }

    #[test]
    fn list_params_ignore_blank_name() {
        let params = ListStudentsParams {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(params.name_filter().is_none());
    }
}
