use actix_web::web::{scope, ServiceConfig};
use actix_web::Scope;
use content::{delete_content, view_content};
use discovery::{get_recommendations, get_related_content, get_trending};
use self::health_check::*;
use playback::{
    complete_playback_session, get_playback_session, start_playback, update_playback_session,
};
use profiles::{
    add_to_my_list, create_profile, delete_profile, get_my_list, list_profiles,
    remove_from_my_list,
};
use progress::{get_continue_watching, get_watch_history, report_progress};

mod content;
mod discovery;
mod health_check;
mod playback;
mod profiles;
mod progress;

fn playback_routes() -> Scope {
    scope("playback")
        .service(start_playback)
        .service(get_playback_session)
        .service(update_playback_session)
        .service(complete_playback_session)
}

fn progress_routes() -> Scope {
    scope("progress")
        .service(report_progress)
        .service(get_watch_history)
        .service(get_continue_watching)
}

fn recommendations_routes() -> Scope {
    scope("recommendations").service(get_recommendations)
}

fn content_routes() -> Scope {
    // `/trending` must be matched before `/{id}`
    scope("content")
        .service(get_trending)
        .service(get_related_content)
        .service(view_content)
        .service(delete_content)
}

fn profiles_routes() -> Scope {
    scope("profiles")
        .service(list_profiles)
        .service(create_profile)
        .service(delete_profile)
        .service(get_my_list)
        .service(add_to_my_list)
        .service(remove_from_my_list)
}

pub fn vidstream_routes(conf: &mut ServiceConfig) {
    conf.service(
        scope("api/v1")
            .service(playback_routes())
            .service(progress_routes())
            .service(recommendations_routes())
            .service(content_routes())
            .service(profiles_routes())
            .service(health_check),
    );
}
