//! GraphQL documents sent to the Lens API.

pub const PROFILE_FIELDS: &str = r#"
fragment ProfileFields on Profile {
  id
  ownedBy {
    address
    chainId
  }
  handle {
    fullHandle
    localName
  }
  metadata {
    displayName
    bio
  }
}
"#;

pub const PROFILES_MANAGED_OPERATION: &str = "ProfilesManaged";

pub const PROFILES_MANAGED: &str = r#"
query ProfilesManaged(
  $profilesManagedRequest: ProfilesManagedRequest!
  $lastLoggedInProfileRequest: LastLoggedInProfileRequest!
) {
  profilesManaged(request: $profilesManagedRequest) {
    items {
      ...ProfileFields
    }
    pageInfo {
      next
      prev
    }
  }
  lastLoggedInProfile(request: $lastLoggedInProfileRequest) {
    ...ProfileFields
  }
}
"#;

pub const HIDE_MANAGED_PROFILE_OPERATION: &str = "HideManagedProfile";

pub const HIDE_MANAGED_PROFILE: &str = r#"
mutation HideManagedProfile($request: HideManagedProfileRequest!) {
  hideManagedProfile(request: $request)
}
"#;

pub const UNHIDE_MANAGED_PROFILE_OPERATION: &str = "UnhideManagedProfile";

pub const UNHIDE_MANAGED_PROFILE: &str = r#"
mutation UnhideManagedProfile($request: UnhideManagedProfileRequest!) {
  unhideManagedProfile(request: $request)
}
"#;

/// Query document with its fragments appended.
pub fn profiles_managed_document() -> String {
    format!("{PROFILES_MANAGED}{PROFILE_FIELDS}")
}
