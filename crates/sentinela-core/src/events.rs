/*!
 * Sentinela Events
 *
 * Barramento de eventos em processo sobre canais mpsc. Cada mudança de
 * estado observável é publicada como struct tipada; consumidores que
 * não escutam não custam nada ao caminho quente.
 */

use tokio::sync::mpsc;

/// Invólucro simples sobre canais [`tokio::sync::mpsc`].
pub struct EventBus<T> {
    sender: mpsc::Sender<T>,
}

impl<T> EventBus<T> {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<T>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { sender: tx }, rx)
    }

    pub fn sender(&self) -> mpsc::Sender<T> {
        self.sender.clone()
    }
}

/// Publica sem bloquear; canal cheio ou fechado descarta o evento.
/// O caminho de decisão nunca espera por consumidores.
pub fn publish<T>(sender: &Option<mpsc::Sender<T>>, event: T) {
    if let Some(tx) = sender {
        let _ = tx.try_send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bus_delivers_events() {
        let (bus, mut rx) = EventBus::new(4);
        let sender = Some(bus.sender());
        publish(&sender, 7u32);
        assert_eq!(rx.recv().await, Some(7));
    }

    #[tokio::test]
    async fn publish_without_listener_is_noop() {
        publish::<u32>(&None, 7);

        let (bus, rx) = EventBus::new(1);
        drop(rx);
        let sender = Some(bus.sender());
        publish(&sender, 7u32);
    }
}
