/*!

# Networking Interfaces and Methods

## Introduction

The mixnet client exposes a minimalistic binary interface via a local websocket.
An application uses it to learn its own address, to send messages into the mix
network and to answer messages anonymously through reply SURBs.

Every websocket binary message carries exactly one frame. Frames are not
length-prefixed themselves, the websocket already delimits them.

All variable-size data is prefixed with its length as a big-endian u64. Tags
are a single byte. Addresses have a pinned length (see `params`) and are not
prefixed.

## Requests

```bytes
0x00 SEND           [0x00][with_reply_surb:1][recipient][msg_len:8][message]
0x01 REPLY          [0x01][surb_len:8][surb][msg_len:8][message]
0x02 SELF_ADDRESS   [0x02]
```

The `ClientRequest` type carries this data.

## Responses

```bytes
0x00 ERROR          [0x00][diagnostic bytes]
0x01 RECEIVED       [0x01][0x00][msg_len:8][message]
                    [0x01][0x01][surb_len:8][surb][msg_len:8][message]
0x02 SELF_ADDRESS   [0x02][address]
```

The `ServerResponse` type carries this data.

### ERROR

The diagnostic payload is free-form, usually UTF-8 text. An error frame always
decodes.

### RECEIVED

A message delivered through the mix network. The reply flag must be exactly 0
or 1. The SURB is present only when the sender requested one with SEND; a
message that arrived as a REPLY never carries one.

## Correlation

There is no request identifier on the wire. Responses to SELF_ADDRESS are
matched by keeping a single query outstanding per connection; RECEIVED frames
may arrive at any time, interleaved with query responses.

*/

pub mod client;
pub mod error;
pub(crate) mod filters;
mod frame;
pub(crate) mod handlers;
pub mod loopback;
pub mod request;
pub mod response;
pub mod signals;
pub(crate) mod socket;
pub mod tags;
