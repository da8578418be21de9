use alloy::sol;

sol! {
interface IDocumentState {
    function addUser(string userName, string role) external;
}

}
