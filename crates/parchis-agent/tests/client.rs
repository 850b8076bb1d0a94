//! Runs `AgentClient` against a scripted server on a real socket.

use parchis_agent::{AgentClient, ClientConfig, ClientError};
use parchis_protocol::{ClientMessage, PlayerId};
use parchis_transport::{Connection, TcpConnection, TcpTransport, Transport};

async fn listen() -> (TcpTransport, ClientConfig) {
    let transport = TcpTransport::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let config = ClientConfig {
        server_addr: transport.local_addr().expect("local addr").to_string(),
        seed: Some(7),
        ..ClientConfig::default()
    };
    (transport, config)
}

async fn recv_move(server: &TcpConnection) -> ClientMessage {
    let line = server
        .recv_line()
        .await
        .expect("recv")
        .expect("client should answer");
    line.parse().expect("client sends valid moves")
}

#[tokio::test]
async fn test_client_answers_turns_until_game_over() {
    let (mut transport, config) = listen().await;

    let script = tokio::spawn(async move {
        let server = transport.accept().await.expect("accept");
        server.send_line("Welcome 1").await.unwrap();

        // Pawn 0 is ahead of pawn 2 whatever the dice.
        server
            .send_line(&format!("State {} 10 F 2 F", ".".repeat(40)))
            .await
            .unwrap();
        server.send_line("Your turn").await.unwrap();
        let first = recv_move(&server).await;

        server.send_line("Moved 1 0 4 14").await.unwrap();
        server.send_line("this is not a message").await.unwrap();
        server.send_line("Skipped 0").await.unwrap();

        // Everything finished: the only answer is a pass.
        server
            .send_line(&format!("State {} F F F F", ".".repeat(40)))
            .await
            .unwrap();
        server.send_line("Your turn").await.unwrap();
        let second = recv_move(&server).await;

        server.send_line("Game Over. Winner: 1").await.unwrap();
        (first, second)
    });

    let client = AgentClient::connect(&config).await.expect("connect");
    let outcome = client.run().await.expect("game should end cleanly");

    assert_eq!(outcome.me, Some(PlayerId(1)));
    assert_eq!(outcome.winner, Some(PlayerId(1)));
    assert!(outcome.won());

    let (first, second) = script.await.unwrap();
    match first {
        ClientMessage::Move { selected_pawn, delta } => {
            assert_eq!(selected_pawn, 0);
            assert!((-5..=12).contains(&delta));
        }
        ClientMessage::Pass => panic!("open board always has a move"),
    }
    assert_eq!(second, ClientMessage::Pass);
}

#[tokio::test]
async fn test_turn_without_state_passes() {
    let (mut transport, config) = listen().await;

    let script = tokio::spawn(async move {
        let server = transport.accept().await.expect("accept");
        server.send_line("Welcome 0").await.unwrap();
        server.send_line("Your turn").await.unwrap();
        let answer = recv_move(&server).await;
        server.send_line("Game Over").await.unwrap();
        answer
    });

    let outcome = AgentClient::connect(&config)
        .await
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(script.await.unwrap(), ClientMessage::Pass);
    assert_eq!(outcome.winner, None);
    assert!(!outcome.won());
}

#[tokio::test]
async fn test_hang_up_before_game_over_is_an_error() {
    let (mut transport, config) = listen().await;

    tokio::spawn(async move {
        let server = transport.accept().await.expect("accept");
        server.send_line("Welcome 2").await.unwrap();
        server.close().await.unwrap();
        // Keep the read half alive until the client notices.
        let _ = server.recv_line().await;
    });

    let result = AgentClient::connect(&config).await.unwrap().run().await;
    assert!(matches!(result, Err(ClientError::Disconnected)));
}

#[tokio::test]
async fn test_connect_to_nothing_fails() {
    let (transport, config) = listen().await;
    drop(transport);

    let result = AgentClient::connect(&config).await;
    assert!(matches!(result, Err(ClientError::Transport(_))));
}

#[tokio::test]
async fn test_own_forfeit_ends_the_run() {
    let (mut transport, config) = listen().await;

    tokio::spawn(async move {
        let server = transport.accept().await.expect("accept");
        server.send_line("Welcome 0").await.unwrap();
        server.send_line("Forfeit 1 no move within 30ms").await.unwrap();
        server.send_line("Forfeit 0 no move within 30ms").await.unwrap();
        server.close().await.unwrap();
        let _ = server.recv_line().await;
    });

    let result = AgentClient::connect(&config).await.unwrap().run().await;
    match result {
        Err(ClientError::Forfeited(reason)) => assert_eq!(reason, "no move within 30ms"),
        other => panic!("expected a forfeit, got {other:?}"),
    }
}
