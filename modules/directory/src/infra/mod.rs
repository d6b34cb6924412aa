pub mod ldap_client;
