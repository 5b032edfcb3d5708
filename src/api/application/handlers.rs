use actix_web::{
    delete, get, patch, post,
    web::{Data, Path, Query, ServiceConfig, scope},
    HttpResponse,
};
use actix_web_validator::Json;
use uuid::Uuid;

use super::dto::ListParams;
use super::models::{CreateApplication, UpdateApplication};
use super::service::{ApplicationService, ServiceError};

#[get("")]
async fn list_applications(
    service: Data<ApplicationService>,
    params: Query<ListParams>,
) -> Result<HttpResponse, ServiceError> {
    let result = service
        .get_all(
            params.filters(),
            params.sort(),
            params.page(),
            params.page_size(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

#[get("/stats")]
async fn application_stats(
    service: Data<ApplicationService>,
) -> Result<HttpResponse, ServiceError> {
    let stats = service.get_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[get("/{id}")]
async fn get_application(
    service: Data<ApplicationService>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let application = service.get_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(application))
}

#[post("")]
async fn create_application(
    service: Data<ApplicationService>,
    data: Json<CreateApplication>,
) -> Result<HttpResponse, ServiceError> {
    let application = service.create(&data).await?;
    Ok(HttpResponse::Created().json(application))
}

#[patch("/{id}")]
async fn update_application(
    service: Data<ApplicationService>,
    id: Path<Uuid>,
    data: Json<UpdateApplication>,
) -> Result<HttpResponse, ServiceError> {
    let application = service.update(id.into_inner(), &data).await?;
    Ok(HttpResponse::Ok().json(application))
}

#[delete("/{id}")]
async fn delete_application(
    service: Data<ApplicationService>,
    id: Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    service.remove(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn application_config(config: &mut ServiceConfig) {
    // /stats must be registered before /{id} so it is not captured as an id.
    config.service(
        scope("/applications")
            .service(list_applications)
            .service(application_stats)
            .service(create_application)
            .service(get_application)
            .service(update_application)
            .service(delete_application),
    );
}
