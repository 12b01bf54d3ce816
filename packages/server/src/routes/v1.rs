use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/wallet", wallet_routes())
        .nest("/membership", membership_routes())
        .nest("/contests", contest_routes())
        .nest("/questions", question_routes())
        .routes(routes!(handlers::contest::list_my_participations))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn wallet_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::wallet::recharge))
        .routes(routes!(handlers::wallet::withdraw))
        .routes(routes!(handlers::wallet::get_account))
        .routes(routes!(handlers::wallet::list_transactions))
}

fn membership_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::membership::purchase))
        .routes(routes!(handlers::membership::get_membership))
        .routes(routes!(handlers::membership::get_status))
        .routes(routes!(handlers::membership::list_plans))
}

fn contest_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::contest::list_contests))
        .routes(routes!(handlers::contest::get_contest))
        .routes(routes!(handlers::contest::register_for_contest))
        .routes(routes!(handlers::contest::start_contest))
        .routes(routes!(handlers::contest::submit_answer))
        .routes(routes!(handlers::contest::finish_contest))
        .routes(routes!(handlers::contest::get_ranking))
        .routes(routes!(handlers::contest::get_my_participation))
}

fn question_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::question::list_questions))
        .routes(routes!(handlers::question::random_question))
        .routes(routes!(handlers::question::list_attempts))
        .routes(routes!(handlers::question::get_question))
        .routes(routes!(handlers::question::practice_question))
}
