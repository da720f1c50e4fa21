use actix_web::{delete, get, post, web, HttpResponse, Result};
use uuid::Uuid;

use crate::core::jwt_auth::AuthenticatedAccount;
use crate::core::{AppError, AppSuccessResponse};
use crate::db::{CatalogStore, ProfileStore};
use crate::models::content::ContentRef;
use crate::models::my_list::AddToMyListRequest;
use crate::models::profiles::{CreateProfileRequest, ProfileResponse};
use crate::services::{my_list, profiles as profile_service};

#[tracing::instrument(name = "List Profiles", skip(profiles, account))]
#[get("")]
pub async fn list_profiles(
    profiles: web::Data<dyn ProfileStore>,
    account: AuthenticatedAccount,
) -> Result<HttpResponse, AppError> {
    let list: Vec<ProfileResponse> = profile_service::list_profiles(profiles.get_ref(), &account)
        .await?
        .iter()
        .map(ProfileResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new(
        list,
        "Profiles retrieved successfully",
    )))
}

#[tracing::instrument(name = "Create Profile", skip(profiles, account, request))]
#[post("")]
pub async fn create_profile(
    profiles: web::Data<dyn ProfileStore>,
    account: AuthenticatedAccount,
    request: web::Json<CreateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let profile =
        profile_service::create_profile(profiles.get_ref(), &account, request.into_inner().name)
            .await?;

    Ok(HttpResponse::Created().json(AppSuccessResponse::new(
        ProfileResponse::from(&profile),
        "Profile created successfully",
    )))
}

#[tracing::instrument(name = "Delete Profile", skip(profiles, account))]
#[delete("/{profile_id}")]
pub async fn delete_profile(
    profiles: web::Data<dyn ProfileStore>,
    account: AuthenticatedAccount,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    profile_service::delete_profile(profiles.get_ref(), &account, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new((), "Profile deleted successfully")))
}

#[tracing::instrument(name = "Get My List", skip(catalog, profiles, account))]
#[get("/{profile_id}/my-list")]
pub async fn get_my_list(
    catalog: web::Data<dyn CatalogStore>,
    profiles: web::Data<dyn ProfileStore>,
    account: AuthenticatedAccount,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let items =
        my_list::get_my_list(catalog.get_ref(), profiles.get_ref(), &account, path.into_inner())
            .await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new(
        items,
        "My list retrieved successfully",
    )))
}

#[tracing::instrument(name = "Add To My List", skip(catalog, profiles, account, request))]
#[post("/{profile_id}/my-list")]
pub async fn add_to_my_list(
    catalog: web::Data<dyn CatalogStore>,
    profiles: web::Data<dyn ProfileStore>,
    account: AuthenticatedAccount,
    path: web::Path<Uuid>,
    request: web::Json<AddToMyListRequest>,
) -> Result<HttpResponse, AppError> {
    let added = my_list::add_to_my_list(
        catalog.get_ref(),
        profiles.get_ref(),
        &account,
        path.into_inner(),
        ContentRef::new(request.content_type, request.content_id),
    )
    .await?;

    let message = if added {
        "Added to my list"
    } else {
        "Already on my list"
    };
    Ok(HttpResponse::Ok().json(AppSuccessResponse::new((), message)))
}

#[tracing::instrument(name = "Remove From My List", skip(profiles, account))]
#[delete("/{profile_id}/my-list/{content_id}")]
pub async fn remove_from_my_list(
    profiles: web::Data<dyn ProfileStore>,
    account: AuthenticatedAccount,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (profile_id, content_id) = path.into_inner();
    my_list::remove_from_my_list(profiles.get_ref(), &account, profile_id, content_id).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse::new((), "Removed from my list")))
}
