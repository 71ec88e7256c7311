//! Student handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateStudentRequest, ListAllStudentsParams, ListStudentsParams, PaginationView, StudentDto,
    UpdateStudentRequest,
};
use crate::application::StudentQueryRepository;
use crate::domain::{DomainError, StudentPatch};
use crate::interfaces::http::common::{ApiError, ApiQuery, ApiResponse, ValidatedJson};
use crate::shared::validations::is_uuid_v4;

/// Student handler state
#[derive(Clone)]
pub struct StudentHandlerState {
    pub repository: Arc<StudentQueryRepository>,
}

fn check_id(id: &str) -> Result<(), ApiError> {
    if is_uuid_v4(id) {
        Ok(())
    } else {
        Err(ApiError::invalid_param("id"))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/alunos",
    tag = "Students",
    params(ListStudentsParams),
    responses(
        (status = 200, description = "One page of students", body = PaginationView<StudentDto>),
        (status = 400, description = "Invalid page or limit", body = ApiResponse<String>)
    )
)]
pub async fn list_students(
    State(state): State<StudentHandlerState>,
    ApiQuery(params): ApiQuery<ListStudentsParams>,
) -> Result<Json<PaginationView<StudentDto>>, ApiError> {
    let repo = &state.repository;
    let page = match params.name_filter() {
        Some(name) => repo.get_by_name_paged(name, params.page, params.limit).await?,
        None => repo.get_all_paged(params.page, params.limit).await?,
    };
    Ok(Json(PaginationView::from(page.map(StudentDto::from))))
}

#[utoipa::path(
    get,
    path = "/api/v1/alunos/todos",
    tag = "Students",
    params(ListAllStudentsParams),
    responses(
        (status = 200, description = "Every matching student, unpaginated", body = ApiResponse<Vec<StudentDto>>)
    )
)]
pub async fn list_all_students(
    State(state): State<StudentHandlerState>,
    ApiQuery(params): ApiQuery<ListAllStudentsParams>,
) -> Result<Json<ApiResponse<Vec<StudentDto>>>, ApiError> {
    let repo = &state.repository;
    let students = match params.name.as_deref().filter(|n| !n.trim().is_empty()) {
        Some(name) => repo.get_by_name(name).await?,
        None => repo.get_all().await?,
    };
    Ok(Json(ApiResponse::success(
        students.into_iter().map(StudentDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/alunos/{id}",
    tag = "Students",
    params(("id" = String, Path, description = "Student id (UUID v4)")),
    responses(
        (status = 200, description = "Student details", body = ApiResponse<StudentDto>),
        (status = 400, description = "Malformed id", body = ApiResponse<String>),
        (status = 404, description = "Not found", body = ApiResponse<String>)
    )
)]
pub async fn get_student(
    State(state): State<StudentHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    check_id(&id)?;
    let student = state.repository.get_by_id(&id).await?;
    Ok(Json(ApiResponse::success(student.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/alunos",
    tag = "Students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<StudentDto>),
        (status = 400, description = "Validation error", body = ApiResponse<String>),
        (status = 409, description = "A student with this rga already exists", body = ApiResponse<String>)
    )
)]
pub async fn create_student(
    State(state): State<StudentHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StudentDto>>), ApiError> {
    let created = state.repository.add(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/alunos/{id}",
    tag = "Students",
    params(("id" = String, Path, description = "Student id (UUID v4)")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<StudentDto>),
        (status = 400, description = "Validation error", body = ApiResponse<String>),
        (status = 404, description = "Not found", body = ApiResponse<String>),
        (status = 409, description = "rga belongs to another student", body = ApiResponse<String>)
    )
)]
pub async fn update_student(
    State(state): State<StudentHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStudentRequest>,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    check_id(&id)?;
    let patch = StudentPatch::from(request);
    if patch.is_empty() {
        return Err(DomainError::Validation("at least one field must be provided".into()).into());
    }

    let updated = state.repository.update(&id, patch).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/alunos/{id}",
    tag = "Students",
    params(("id" = String, Path, description = "Student id (UUID v4)")),
    responses(
        (status = 200, description = "Deleted; returns the removed record", body = ApiResponse<StudentDto>),
        (status = 400, description = "Malformed id", body = ApiResponse<String>),
        (status = 404, description = "Not found", body = ApiResponse<String>)
    )
)]
pub async fn delete_student(
    State(state): State<StudentHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    check_id(&id)?;
    let deleted = state.repository.delete(&id).await?;
    Ok(Json(ApiResponse::success(deleted.into())))
}
