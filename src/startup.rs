use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::AuthService;
use crate::middleware::JwtMiddleware;
use crate::routes::{create_user, health_check, login, refresh, revoke, update_user};

pub fn run(listener: TcpListener, auth: AuthService) -> Result<Server, std::io::Error> {
    let auth = web::Data::new(auth);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(auth.clone())
            .route("/api/healthz", web::get().to(health_check))
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))
            .service(
                web::resource("/api/users")
                    .route(web::post().to(create_user))
                    // Protected: requires a valid access token
                    .route(
                        web::put()
                            .to(update_user)
                            .wrap(JwtMiddleware::new(auth.clone())),
                    ),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
