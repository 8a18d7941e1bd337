use axum::Router;


/// Поднять локальный HTTP-сервер вместо внешнего TTS и вернуть его базовый URL
pub(super) async fn spawn_fake_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
