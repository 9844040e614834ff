#[test]
fn streaming_compiles() {
    use futures_util::stream::Stream;
    use serde::{Deserialize, Serialize};
    use varlink::proxy;

    #[proxy("org.example.Stream")]
    #[allow(dead_code)]
    trait StreamProxy {
        async fn get_single(&mut self) -> varlink::Result<Result<String, Error>>;

        #[varlink(more)]
        async fn get_stream(
            &mut self,
        ) -> varlink::Result<impl Stream<Item = varlink::Result<Result<String, Error>>>>;

        #[varlink(rename = "CustomStream", more)]
        async fn custom_stream(
            &mut self,
            count: i32,
        ) -> varlink::Result<impl Stream<Item = varlink::Result<Result<Item, Error>>>>;
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Item {
        id: u32,
        name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Error;
}
